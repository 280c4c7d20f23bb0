//! Pure admission validation.
//!
//! Single and batch sequence checks, separated from the cursor so callers
//! can validate an entire batch before mutating anything.

use crate::error::OrderingError;
use crate::ordering::OrderingRule;

/// Validate a single candidate sequence against the current cursor value.
pub fn validate_sequence(
    rule: OrderingRule,
    latest: u64,
    candidate: u64,
) -> Result<(), OrderingError> {
    rule.validate(latest, candidate)
}

/// Validate a batch of sequences against the pre-call cursor value.
///
/// The first entry must extend `latest`; each later entry must extend its
/// predecessor under the same rule. An empty batch is trivially valid.
pub fn validate_batch(
    rule: OrderingRule,
    latest: u64,
    sequences: &[u64],
) -> Result<(), OrderingError> {
    let mut cursor = latest;
    for &sequence in sequences {
        validate_sequence(rule, cursor, sequence)?;
        cursor = sequence;
    }
    Ok(())
}
