//! The dispatch engine: bounded, failure-absorbing handler invocation.
//!
//! The ledger's two core guarantees - monotonic ordering and durable
//! history - must survive arbitrary handler code. The engine therefore runs
//! the handler inside a panic boundary, treats every failure as data rather
//! than as an error, and falls back to the `Store` decision whenever the
//! handler's own decision cannot be trusted.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::budget::Budget;
use crate::handler::{Decision, Delivery, HandlerError, OracleHandler};

/// Why a handler invocation was discounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The handler panicked; the panic was caught at the engine boundary.
    Panicked,
    /// The handler ran out of fuel.
    BudgetExhausted { requested: u64, remaining: u64 },
    /// The handler returned an error of its own.
    Handler(String),
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchFailure::Panicked => write!(f, "handler panicked"),
            DispatchFailure::BudgetExhausted {
                requested,
                remaining,
            } => write!(
                f,
                "budget exhausted: requested {requested} with {remaining} remaining"
            ),
            DispatchFailure::Handler(reason) => write!(f, "{reason}"),
        }
    }
}

/// How the invocation went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    /// No handler resolved, or the budget was zero; nothing was invoked.
    NotInvoked,
    /// The handler ran to completion and its decision was honored.
    Delivered,
    /// The handler failed; the failure was absorbed and the decision
    /// defaulted to `Store`.
    Absorbed(DispatchFailure),
}

/// The engine's verdict for one admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The final persistence decision applied by the ledger.
    pub decision: Decision,
    /// How that decision came about.
    pub status: DispatchStatus,
}

impl DispatchOutcome {
    fn fail_safe(status: DispatchStatus) -> Self {
        Self {
            decision: Decision::Store,
            status,
        }
    }
}

/// Invoke `handler` for `delivery` under `budget_limit` units of fuel.
///
/// Never fails: a missing handler or a zero budget skips the invocation
/// outright, and every handler-side failure is absorbed into
/// [`DispatchStatus::Absorbed`] with the fail-safe `Store` decision.
pub fn dispatch(
    handler: Option<&Arc<dyn OracleHandler>>,
    delivery: Delivery<'_>,
    budget_limit: u64,
) -> DispatchOutcome {
    let handler = match handler {
        Some(handler) if budget_limit > 0 => handler,
        _ => {
            debug!(
                source_key = %delivery.source_key,
                sequence = delivery.sequence,
                "dispatch skipped, defaulting to store"
            );
            return DispatchOutcome::fail_safe(DispatchStatus::NotInvoked);
        }
    };

    let mut budget = Budget::new(budget_limit);
    let result = catch_unwind(AssertUnwindSafe(|| {
        handler.on_delivery(delivery, &mut budget)
    }));

    match result {
        Ok(Ok(decision)) => DispatchOutcome {
            decision,
            status: DispatchStatus::Delivered,
        },
        Ok(Err(HandlerError::Budget(e))) => {
            warn!(
                source_key = %delivery.source_key,
                sequence = delivery.sequence,
                requested = e.requested,
                "handler exhausted its budget, storing fail-safe"
            );
            DispatchOutcome::fail_safe(DispatchStatus::Absorbed(
                DispatchFailure::BudgetExhausted {
                    requested: e.requested,
                    remaining: e.remaining,
                },
            ))
        }
        Ok(Err(HandlerError::Failed(reason))) => {
            warn!(
                source_key = %delivery.source_key,
                sequence = delivery.sequence,
                %reason,
                "handler failed, storing fail-safe"
            );
            DispatchOutcome::fail_safe(DispatchStatus::Absorbed(DispatchFailure::Handler(reason)))
        }
        Err(_panic) => {
            warn!(
                source_key = %delivery.source_key,
                sequence = delivery.sequence,
                "handler panicked, storing fail-safe"
            );
            DispatchOutcome::fail_safe(DispatchStatus::Absorbed(DispatchFailure::Panicked))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_oracle_core::{SourceId, SourceKey, SourceType};

    struct Fixed(Decision);

    impl OracleHandler for Fixed {
        fn on_delivery(
            &self,
            _delivery: Delivery<'_>,
            budget: &mut Budget,
        ) -> Result<Decision, HandlerError> {
            budget.consume(1)?;
            Ok(self.0)
        }
    }

    struct Panics;

    impl OracleHandler for Panics {
        fn on_delivery(
            &self,
            _delivery: Delivery<'_>,
            _budget: &mut Budget,
        ) -> Result<Decision, HandlerError> {
            panic!("handler bug");
        }
    }

    struct Fails;

    impl OracleHandler for Fails {
        fn on_delivery(
            &self,
            _delivery: Delivery<'_>,
            _budget: &mut Budget,
        ) -> Result<Decision, HandlerError> {
            Err(HandlerError::failed("upstream unreachable"))
        }
    }

    struct Hungry;

    impl OracleHandler for Hungry {
        fn on_delivery(
            &self,
            _delivery: Delivery<'_>,
            budget: &mut Budget,
        ) -> Result<Decision, HandlerError> {
            budget.consume(1_000_000)?;
            Ok(Decision::Skip)
        }
    }

    fn delivery() -> Delivery<'static> {
        let source_type = SourceType(0);
        let source_id = SourceId(1);
        Delivery {
            source_type,
            source_id,
            source_key: SourceKey::derive(source_type, source_id),
            sequence: 1,
            payload: b"payload",
        }
    }

    #[test]
    fn test_no_handler_defaults_to_store() {
        let outcome = dispatch(None, delivery(), 100);
        assert_eq!(outcome.decision, Decision::Store);
        assert_eq!(outcome.status, DispatchStatus::NotInvoked);
    }

    #[test]
    fn test_zero_budget_skips_invocation() {
        let handler: Arc<dyn OracleHandler> = Arc::new(Panics);
        // The panicking handler is never reached.
        let outcome = dispatch(Some(&handler), delivery(), 0);
        assert_eq!(outcome.decision, Decision::Store);
        assert_eq!(outcome.status, DispatchStatus::NotInvoked);
    }

    #[test]
    fn test_delivered_decision_is_honored() {
        let store: Arc<dyn OracleHandler> = Arc::new(Fixed(Decision::Store));
        let skip: Arc<dyn OracleHandler> = Arc::new(Fixed(Decision::Skip));

        let outcome = dispatch(Some(&store), delivery(), 10);
        assert_eq!(outcome.decision, Decision::Store);
        assert_eq!(outcome.status, DispatchStatus::Delivered);

        let outcome = dispatch(Some(&skip), delivery(), 10);
        assert_eq!(outcome.decision, Decision::Skip);
        assert_eq!(outcome.status, DispatchStatus::Delivered);
    }

    #[test]
    fn test_panic_is_absorbed_into_store() {
        let handler: Arc<dyn OracleHandler> = Arc::new(Panics);
        let outcome = dispatch(Some(&handler), delivery(), 10);
        assert_eq!(outcome.decision, Decision::Store);
        assert_eq!(
            outcome.status,
            DispatchStatus::Absorbed(DispatchFailure::Panicked)
        );
    }

    #[test]
    fn test_handler_error_is_absorbed_into_store() {
        let handler: Arc<dyn OracleHandler> = Arc::new(Fails);
        let outcome = dispatch(Some(&handler), delivery(), 10);
        assert_eq!(outcome.decision, Decision::Store);
        assert!(matches!(
            outcome.status,
            DispatchStatus::Absorbed(DispatchFailure::Handler(_))
        ));
    }

    #[test]
    fn test_budget_exhaustion_is_absorbed_into_store() {
        let handler: Arc<dyn OracleHandler> = Arc::new(Hungry);
        // The handler wanted to skip, but its decision is not trusted.
        let outcome = dispatch(Some(&handler), delivery(), 10);
        assert_eq!(outcome.decision, Decision::Store);
        assert_eq!(
            outcome.status,
            DispatchStatus::Absorbed(DispatchFailure::BudgetExhausted {
                requested: 1_000_000,
                remaining: 10,
            })
        );
    }
}
