//! Admission ordering rules.
//!
//! Deployments disagree on how strict admission should be: some require each
//! sequence to equal `cursor + 1`, others merely require it to exceed the
//! cursor. Both are first-class here; an instance picks exactly one at
//! construction and never mixes them.

use serde::{Deserialize, Serialize};

use crate::error::OrderingError;

/// The rule a new sequence must satisfy against the current cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingRule {
    /// The sequence must strictly exceed the cursor. Gaps are allowed, so a
    /// relayer that missed an upstream event cannot wedge the source.
    StrictlyIncreasing,

    /// The sequence must equal `cursor + 1`. Contiguous delivery, no gaps.
    GapFree,
}

impl OrderingRule {
    /// Validate `candidate` against the current `latest` cursor value.
    pub fn validate(self, latest: u64, candidate: u64) -> Result<(), OrderingError> {
        if candidate <= latest {
            return Err(OrderingError::StaleSequence { latest, candidate });
        }
        if self == OrderingRule::GapFree && candidate != latest + 1 {
            return Err(OrderingError::SequenceGap {
                expected: latest + 1,
                candidate,
            });
        }
        Ok(())
    }
}

impl Default for OrderingRule {
    fn default() -> Self {
        OrderingRule::StrictlyIncreasing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strictly_increasing_accepts_gaps() {
        let rule = OrderingRule::StrictlyIncreasing;
        assert!(rule.validate(0, 1).is_ok());
        assert!(rule.validate(0, 100).is_ok());
        assert!(rule.validate(5, 6).is_ok());
        assert!(rule.validate(5, 50).is_ok());
    }

    #[test]
    fn test_strictly_increasing_rejects_stale() {
        let rule = OrderingRule::StrictlyIncreasing;
        assert!(matches!(
            rule.validate(5, 5),
            Err(OrderingError::StaleSequence {
                latest: 5,
                candidate: 5
            })
        ));
        assert!(rule.validate(5, 4).is_err());
        assert!(rule.validate(0, 0).is_err());
    }

    #[test]
    fn test_gap_free_requires_successor() {
        let rule = OrderingRule::GapFree;
        assert!(rule.validate(0, 1).is_ok());
        assert!(rule.validate(7, 8).is_ok());
        assert!(matches!(
            rule.validate(7, 9),
            Err(OrderingError::SequenceGap {
                expected: 8,
                candidate: 9
            })
        ));
        assert!(rule.validate(7, 7).is_err());
    }

    #[test]
    fn test_zero_is_never_admissible() {
        // 0 is the uninitialized cursor marker and can never be admitted.
        assert!(OrderingRule::StrictlyIncreasing.validate(0, 0).is_err());
        assert!(OrderingRule::GapFree.validate(0, 0).is_err());
    }
}
