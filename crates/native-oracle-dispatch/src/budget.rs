//! Fuel budgets for handler invocations.
//!
//! The host environment's gas metering becomes an explicit fuel counter the
//! handler draws from. Exhaustion is an error the handler propagates with
//! `?`; the engine treats it as an absorbed failure, never a fatal one.

use thiserror::Error;

/// Raised when a handler asks for more fuel than its budget holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("budget exceeded: requested {requested} with {remaining} remaining")]
pub struct BudgetExceeded {
    pub requested: u64,
    pub remaining: u64,
}

/// The fuel a single handler invocation may spend.
///
/// The caller of `record` supplies the limit per entry; the handler calls
/// [`Budget::consume`] as it works and stops the moment fuel runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    remaining: u64,
}

impl Budget {
    /// Create a budget with the given fuel limit.
    pub fn new(limit: u64) -> Self {
        Self { remaining: limit }
    }

    /// Fuel left to spend.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Whether any fuel is left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Spend `units` of fuel.
    ///
    /// Fails without spending anything if the budget cannot cover the
    /// request.
    pub fn consume(&mut self, units: u64) -> Result<(), BudgetExceeded> {
        if units > self.remaining {
            return Err(BudgetExceeded {
                requested: units,
                remaining: self.remaining,
            });
        }
        self.remaining -= units;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_within_budget() {
        let mut budget = Budget::new(10);
        budget.consume(4).unwrap();
        budget.consume(6).unwrap();
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_consume_over_budget_fails_without_spending() {
        let mut budget = Budget::new(5);
        let err = budget.consume(6).unwrap_err();
        assert_eq!(
            err,
            BudgetExceeded {
                requested: 6,
                remaining: 5
            }
        );
        // Nothing was spent on the failed request.
        assert_eq!(budget.remaining(), 5);
        budget.consume(5).unwrap();
    }

    #[test]
    fn test_zero_budget_is_exhausted() {
        let budget = Budget::new(0);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_consume_zero_always_succeeds() {
        let mut budget = Budget::new(0);
        budget.consume(0).unwrap();
    }

    proptest::proptest! {
        #[test]
        fn prop_spend_never_exceeds_limit(
            limit in 0u64..10_000,
            draws in proptest::collection::vec(0u64..500, 0..64),
        ) {
            let mut budget = Budget::new(limit);
            let mut spent = 0u64;
            for draw in draws {
                if budget.consume(draw).is_ok() {
                    spent += draw;
                }
            }
            proptest::prop_assert!(spent <= limit);
            proptest::prop_assert_eq!(budget.remaining(), limit - spent);
        }
    }
}
