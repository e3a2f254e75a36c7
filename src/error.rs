//! Error types for fileshelf.

use thiserror::Error;

/// Common error type for fileshelf.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// I/O error from the storage directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Filename rejected by validation (traversal, separators, empty).
    #[error("invalid filename: {0}")]
    InvalidName(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Resource already exists.
    #[error("{0} already exists")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for fileshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
