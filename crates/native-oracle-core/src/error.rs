//! Error types for the Native Oracle core.

use thiserror::Error;

/// Ordering violations raised during admission.
///
/// These are always fatal to the enclosing call: admitting an out-of-order
/// sequence would corrupt the replay-protection guarantee every downstream
/// consumer relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("sequence {candidate} does not exceed the cursor at {latest}")]
    StaleSequence { latest: u64, candidate: u64 },

    #[error("sequence {candidate} leaves a gap: expected {expected}")]
    SequenceGap { expected: u64, candidate: u64 },
}
