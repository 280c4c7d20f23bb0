//! Stub handler implementations.
//!
//! Every failure mode the dispatch engine must absorb, plus a recording
//! handler for asserting on what a handler actually saw.

use std::sync::Mutex;

use native_oracle::{Budget, Decision, Delivery, HandlerError, OracleHandler};
use native_oracle_core::SourceKey;

/// Returns a fixed decision after consuming one unit of fuel.
pub struct FixedHandler {
    decision: Decision,
    cost: u64,
}

impl FixedHandler {
    pub fn new(decision: Decision) -> Self {
        Self { decision, cost: 1 }
    }

    /// Same, but consuming `cost` units per delivery.
    pub fn with_cost(decision: Decision, cost: u64) -> Self {
        Self { decision, cost }
    }
}

impl OracleHandler for FixedHandler {
    fn on_delivery(
        &self,
        _delivery: Delivery<'_>,
        budget: &mut Budget,
    ) -> Result<Decision, HandlerError> {
        budget.consume(self.cost)?;
        Ok(self.decision)
    }
}

/// Always returns an error, like a contract call that reverts.
pub struct RevertingHandler;

impl OracleHandler for RevertingHandler {
    fn on_delivery(
        &self,
        _delivery: Delivery<'_>,
        _budget: &mut Budget,
    ) -> Result<Decision, HandlerError> {
        Err(HandlerError::failed("reverted"))
    }
}

/// Always panics; the engine must catch it.
pub struct PanickingHandler;

impl OracleHandler for PanickingHandler {
    fn on_delivery(
        &self,
        _delivery: Delivery<'_>,
        _budget: &mut Budget,
    ) -> Result<Decision, HandlerError> {
        panic!("stub handler panic");
    }
}

/// Demands more fuel than any sane budget provides.
pub struct HungryHandler {
    demand: u64,
}

impl HungryHandler {
    pub fn new(demand: u64) -> Self {
        Self { demand }
    }
}

impl Default for HungryHandler {
    fn default() -> Self {
        Self { demand: u64::MAX }
    }
}

impl OracleHandler for HungryHandler {
    fn on_delivery(
        &self,
        _delivery: Delivery<'_>,
        budget: &mut Budget,
    ) -> Result<Decision, HandlerError> {
        budget.consume(self.demand)?;
        Ok(Decision::Skip)
    }
}

/// One observed delivery, copied out of the borrowed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenDelivery {
    pub source_key: SourceKey,
    pub sequence: u64,
    pub payload: Vec<u8>,
}

/// Records every delivery it receives and returns a fixed decision.
pub struct RecordingHandler {
    decision: Decision,
    seen: Mutex<Vec<SeenDelivery>>,
}

impl RecordingHandler {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Everything delivered so far, in order.
    pub fn seen(&self) -> Vec<SeenDelivery> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    /// Number of deliveries observed.
    pub fn delivery_count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }
}

impl OracleHandler for RecordingHandler {
    fn on_delivery(
        &self,
        delivery: Delivery<'_>,
        budget: &mut Budget,
    ) -> Result<Decision, HandlerError> {
        budget.consume(1)?;
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(SeenDelivery {
                source_key: delivery.source_key,
                sequence: delivery.sequence,
                payload: delivery.payload.to_vec(),
            });
        }
        Ok(self.decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_oracle_core::{SourceId, SourceType};

    fn delivery(sequence: u64) -> Delivery<'static> {
        let source_type = SourceType(0);
        let source_id = SourceId(1);
        Delivery {
            source_type,
            source_id,
            source_key: SourceKey::derive(source_type, source_id),
            sequence,
            payload: b"payload",
        }
    }

    #[test]
    fn test_recording_handler_captures_in_order() {
        let handler = RecordingHandler::new(Decision::Store);
        let mut budget = Budget::new(10);

        handler.on_delivery(delivery(1), &mut budget).unwrap();
        handler.on_delivery(delivery(2), &mut budget).unwrap();

        let seen = handler.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].sequence, 1);
        assert_eq!(seen[1].sequence, 2);
        assert_eq!(seen[0].payload, b"payload");
    }

    #[test]
    fn test_hungry_handler_fails_on_any_budget() {
        let handler = HungryHandler::default();
        let mut budget = Budget::new(1_000_000);
        assert!(handler.on_delivery(delivery(1), &mut budget).is_err());
    }

    #[test]
    fn test_fixed_handler_cost() {
        let handler = FixedHandler::with_cost(Decision::Skip, 7);
        let mut budget = Budget::new(8);
        assert_eq!(
            handler.on_delivery(delivery(1), &mut budget).unwrap(),
            Decision::Skip
        );
        assert_eq!(budget.remaining(), 1);
        assert!(handler.on_delivery(delivery(2), &mut budget).is_err());
    }
}
