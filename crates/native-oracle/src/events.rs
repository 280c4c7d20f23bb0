//! Observability events.
//!
//! An explicit append-only telemetry channel, decoupled from durable ledger
//! state. Off-chain indexers correlate by `(source_key, sequence)`; the same
//! events are mirrored to `tracing` for operators.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use native_oracle_core::{PayloadHash, SourceKey, SourceType};
use native_oracle_dispatch::Decision;

/// Which binding a governance change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallbackScope {
    /// The per-type default binding.
    Default(SourceType),
    /// The per-source override binding.
    Source(SourceKey),
}

/// One entry in the telemetry log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// An entry passed ordering validation and advanced the cursor.
    EntryAdmitted {
        source_key: SourceKey,
        sequence: u64,
        payload_hash: PayloadHash,
    },

    /// The resolved handler ran to completion.
    HandlerSucceeded {
        source_key: SourceKey,
        sequence: u64,
        decision: Decision,
    },

    /// The resolved handler failed; the failure was absorbed.
    HandlerFailed {
        source_key: SourceKey,
        sequence: u64,
        reason: String,
    },

    /// The handler chose `Skip`; nothing was persisted for this entry.
    StorageSkipped { source_key: SourceKey, sequence: u64 },

    /// A callback binding was set or cleared.
    CallbackChanged { scope: CallbackScope, cleared: bool },
}

/// Append-only in-memory event log.
///
/// Telemetry must never fail the ledger: a poisoned log is skipped, not
/// propagated.
#[derive(Default)]
pub struct EventLog {
    entries: RwLock<Vec<LedgerEvent>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and mirror it to tracing.
    pub fn emit(&self, event: LedgerEvent) {
        match &event {
            LedgerEvent::EntryAdmitted {
                source_key,
                sequence,
                ..
            } => info!(%source_key, sequence, "entry admitted"),
            LedgerEvent::HandlerSucceeded {
                source_key,
                sequence,
                decision,
            } => info!(%source_key, sequence, %decision, "handler succeeded"),
            LedgerEvent::HandlerFailed {
                source_key,
                sequence,
                reason,
            } => warn!(%source_key, sequence, %reason, "handler failed"),
            LedgerEvent::StorageSkipped {
                source_key,
                sequence,
            } => info!(%source_key, sequence, "storage skipped"),
            LedgerEvent::CallbackChanged { scope, cleared } => {
                info!(?scope, cleared, "callback binding changed")
            }
        }

        if let Ok(mut entries) = self.entries.write() {
            entries.push(event);
        }
    }

    /// A copy of every event emitted so far, in order.
    pub fn snapshot(&self) -> Vec<LedgerEvent> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of events emitted so far.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether no events have been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_oracle_core::{SourceId, SourceType};

    fn key() -> SourceKey {
        SourceKey::derive(SourceType(0), SourceId(1))
    }

    #[test]
    fn test_emit_preserves_order() {
        let log = EventLog::new();
        assert!(log.is_empty());

        log.emit(LedgerEvent::EntryAdmitted {
            source_key: key(),
            sequence: 1,
            payload_hash: PayloadHash::digest(b"a"),
        });
        log.emit(LedgerEvent::StorageSkipped {
            source_key: key(),
            sequence: 1,
        });

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LedgerEvent::EntryAdmitted { .. }));
        assert!(matches!(events[1], LedgerEvent::StorageSkipped { .. }));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let log = EventLog::new();
        log.emit(LedgerEvent::CallbackChanged {
            scope: CallbackScope::Default(SourceType(2)),
            cleared: false,
        });

        let before = log.snapshot();
        log.emit(LedgerEvent::CallbackChanged {
            scope: CallbackScope::Source(key()),
            cleared: true,
        });

        assert_eq!(before.len(), 1);
        assert_eq!(log.len(), 2);
    }
}
