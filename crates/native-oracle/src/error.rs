//! Error types for the Native Oracle service.

use native_oracle_core::OrderingError;
use native_oracle_store::StoreError;
use thiserror::Error;

/// Errors visible to callers of the writer and governance surfaces.
///
/// Handler-side failures never appear here: the dispatch engine absorbs
/// them, and they surface only through the event log and the
/// [`crate::Admission`] dispatch status.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Ordering violation. Fatal, nothing was mutated.
    #[error("sequence not valid for this source: {0}")]
    Ordering(#[from] OrderingError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The presented token belongs to a different instance (or role misuse
    /// at a distance); the call was refused outright.
    #[error("unauthorized: {0}")]
    NotAuthorized(&'static str),

    /// Batch arrays disagree on length. Fatal, nothing was admitted.
    #[error(
        "batch shape mismatch: {sequences} sequences, {payloads} payloads, {budgets} budgets"
    )]
    BatchShape {
        sequences: usize,
        payloads: usize,
        budgets: usize,
    },

    /// Payload exceeds the configured size limit.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Invalid operation.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
