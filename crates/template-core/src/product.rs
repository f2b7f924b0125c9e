//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a product must implement to configure
//! where its template collections live and who may open the owner collection.

use crate::auth::CredentialVerifier;
use std::path::PathBuf;

/// Configuration trait for template-fetching CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name, author)
/// - Bundled template location and its env override
/// - Remote repository coordinates and their env override
/// - Owner credential verification
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Author credited after a project is downloaded
    fn author(&self) -> &'static str;

    /// Directory containing the bundled `templates/` and `owner_templates/`
    fn bundled_dir(&self) -> PathBuf;

    /// Environment variable name for overriding the bundled directory
    fn bundled_dir_env(&self) -> &'static str;

    /// Default remote repository, as `owner/repo[@ref]`
    fn default_remote_repo(&self) -> &'static str;

    /// Environment variable name for overriding the remote repository
    fn remote_repo_env(&self) -> &'static str;

    /// Verifier guarding the owner collection
    fn owner_verifier(&self) -> Box<dyn CredentialVerifier>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
