//! Error taxonomy for template operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by template operations
///
/// Bad selection tokens have no variant: they are dropped by the browse
/// session and never reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested project or path does not exist in the collection
    #[error("project not found: {0}")]
    NotFound(String),

    /// Destination of a whole-project copy is already present
    #[error("folder already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Remote listing or fetch failed
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// Owner credential was rejected
    #[error("access denied")]
    AuthFailure,

    /// Destination side I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
