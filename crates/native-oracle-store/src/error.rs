//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record or cursor not found where one was required.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid data in storage (truncated hash, bad enum tag, ...).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Lock poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),

    /// A blocking task failed to complete.
    #[error("background task failed: {0}")]
    Background(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
