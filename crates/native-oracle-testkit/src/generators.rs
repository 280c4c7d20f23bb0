//! Proptest strategies for oracle inputs.

use proptest::collection::vec;
use proptest::prelude::*;

/// Arbitrary payload bytes, up to `max_len`.
pub fn payload_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..=max_len)
}

/// A strictly-ascending sequence chain starting above `after`.
///
/// Steps are in `1..=max_step`, so the chain may contain gaps; valid under
/// `OrderingRule::StrictlyIncreasing` against a cursor at `after`.
pub fn ascending_sequences(after: u64, max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    vec(1u64..=64, 0..=max_len).prop_map(move |steps| {
        let mut sequence = after;
        steps
            .into_iter()
            .map(|step| {
                sequence += step;
                sequence
            })
            .collect()
    })
}

/// A gap-free chain `after+1, after+2, ...`; valid under both rules.
pub fn contiguous_sequences(after: u64, max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    (0..=max_len).prop_map(move |len| (1..=len as u64).map(|i| after + i).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_oracle_core::{validate_batch, OrderingRule};

    proptest! {
        #[test]
        fn prop_ascending_chains_validate(chain in ascending_sequences(5, 16)) {
            prop_assert!(
                validate_batch(OrderingRule::StrictlyIncreasing, 5, &chain).is_ok()
            );
        }

        #[test]
        fn prop_contiguous_chains_validate_gap_free(chain in contiguous_sequences(5, 16)) {
            prop_assert!(validate_batch(OrderingRule::GapFree, 5, &chain).is_ok());
        }

        #[test]
        fn prop_payloads_respect_bound(payload in payload_bytes(64)) {
            prop_assert!(payload.len() <= 64);
        }
    }
}
