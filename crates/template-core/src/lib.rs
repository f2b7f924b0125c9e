//! Template Core - Shared library for template-fetching CLIs
//!
//! This library lists template collections, lets a user browse them one
//! directory at a time and pick files, and copies the picks (or whole
//! projects) into a local workspace. Collections come from a bundled
//! directory tree or from a GitHub repository.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Listing** - `ListingProvider` over local or remote collections
//! - **Layer 2: Browse and copy** - `BrowseSession`, `run_session`, `download_selection`,
//!   `copy_project`, plus the `ProductConfig` trait and owner `CredentialVerifier`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use template_core::{listing::LocalProvider, browse, templates};
//!
//! let provider = LocalProvider::new("templates".into());
//! let selection = browse::run_session(&provider, "flask-app", &mut my_input).await?;
//! let written = templates::download_selection(&selection, &provider, &dest).await?;
//! ```

pub mod auth;
pub mod browse;
pub mod error;
pub mod listing;
pub mod product;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use auth::{CredentialVerifier, LockedVerifier, OsUserVerifier, Sha256Verifier};
pub use browse::{run_session, BrowseSession, BrowseState, SelectionInput, SelectionSet};
pub use error::Error;
pub use listing::{
    Collection, Entry, EntryKind, ListingProvider, SourceKind, TemplateProvider, TemplateSource,
};
pub use product::ProductConfig;
pub use templates::{copy_project, download_selection};

#[cfg(feature = "tui")]
pub use tui::run;
