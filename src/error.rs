//! Error types for huddle.

use thiserror::Error;

/// Common error type for huddle.
#[derive(Error, Debug)]
pub enum HuddleError {
    /// Storage error.
    ///
    /// Any failure talking to the persistence layer: unreachable database,
    /// exhausted pool, failed query. Errors from sqlx are automatically
    /// converted.
    #[error("storage error: {0}")]
    Storage(String),

    /// Data integrity error.
    ///
    /// A persisted message references a sender identity that cannot be
    /// found during enrichment. Fails the containing read rather than
    /// returning a partially-filled record.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for HuddleError {
    fn from(e: sqlx::Error) -> Self {
        HuddleError::Storage(e.to_string())
    }
}

/// Result type alias for huddle operations.
pub type Result<T> = std::result::Result<T, HuddleError>;
