//! The NativeOracle service: admission, dispatch, and queries.
//!
//! Brings the ledger store, the callback registry, and the dispatch engine
//! together behind the three role surfaces: privileged writer, governance
//! authority, and the open read-only query surface.

use std::sync::{Arc, RwLock};

use bytes::Bytes;
use tracing::debug;

use native_oracle_core::{
    validate_batch, OrderingRule, PayloadHash, Record, SourceCursor, SourceId, SourceKey,
    SourceType, StorageMode,
};
use native_oracle_dispatch::{
    dispatch, CallbackRegistry, Decision, Delivery, DispatchStatus, OracleHandler,
};
use native_oracle_store::Store;

use crate::auth::{GovernanceToken, InstanceId, RelayerToken};
use crate::error::{OracleError, Result};
use crate::events::{CallbackScope, EventLog, LedgerEvent};

/// Configuration for an oracle instance.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// The admission rule for every source. Fixed at construction; see
    /// [`OrderingRule`] for the trade-off between the two variants.
    pub ordering: OrderingRule,
    /// Upper bound on a single payload, applied before any other check.
    pub max_payload_bytes: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingRule::StrictlyIncreasing,
            max_payload_bytes: 1024 * 1024,
        }
    }
}

/// A source's cursor as seen by the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    /// Highest admitted sequence, 0 if none.
    pub latest_sequence: u64,
    /// Whether any entry was ever admitted for this source.
    pub initialized: bool,
}

/// The writer-visible result of one admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub source_key: SourceKey,
    pub sequence: u64,
    pub payload_hash: PayloadHash,
    /// The final persistence decision the ledger applied.
    pub decision: Decision,
    /// How the handler invocation went; absorbed failures show up here and
    /// in the event log, never as an error.
    pub dispatch: DispatchStatus,
}

/// The main oracle service.
///
/// Generic over the storage backend. All shared state - cursors, records,
/// bindings - lives behind this instance; the only authority over it is the
/// pair of tokens [`NativeOracle::new`] hands out.
pub struct NativeOracle<S: Store> {
    store: Arc<S>,
    registry: RwLock<CallbackRegistry>,
    events: EventLog,
    config: OracleConfig,
    instance: InstanceId,
}

impl<S: Store> NativeOracle<S> {
    /// Create an oracle instance and mint its role tokens.
    pub fn new(store: S, config: OracleConfig) -> (Self, RelayerToken, GovernanceToken) {
        let instance = InstanceId::generate();
        let oracle = Self {
            store: Arc::new(store),
            registry: RwLock::new(CallbackRegistry::new()),
            events: EventLog::new(),
            config,
            instance,
        };
        (
            oracle,
            RelayerToken::issue(instance),
            GovernanceToken::issue(instance),
        )
    }

    /// Create an oracle with default bindings pre-installed.
    ///
    /// Mirrors deploy-time seeding: every `(source_type, handler)` pair is
    /// bound as a type default before either token escapes, so the first
    /// admitted entry already dispatches.
    pub fn with_bindings(
        store: S,
        config: OracleConfig,
        bindings: Vec<(SourceType, Arc<dyn OracleHandler>)>,
    ) -> (Self, RelayerToken, GovernanceToken) {
        let (oracle, relayer, governance) = Self::new(store, config);
        {
            let mut registry = oracle
                .registry
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            for (source_type, handler) in bindings {
                registry.set_default(source_type, Some(handler));
                oracle.events.emit(LedgerEvent::CallbackChanged {
                    scope: CallbackScope::Default(source_type),
                    cleared: false,
                });
            }
        }
        (oracle, relayer, governance)
    }

    /// The storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The instance configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn authorize_relayer(&self, token: &RelayerToken) -> Result<()> {
        if token.instance() != self.instance {
            return Err(OracleError::NotAuthorized(
                "relayer token from another instance",
            ));
        }
        Ok(())
    }

    fn authorize_governance(&self, token: &GovernanceToken) -> Result<()> {
        if token.instance() != self.instance {
            return Err(OracleError::NotAuthorized(
                "governance token from another instance",
            ));
        }
        Ok(())
    }

    fn check_payload(&self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_bytes {
            return Err(OracleError::PayloadTooLarge {
                size: payload.len(),
                limit: self.config.max_payload_bytes,
            });
        }
        Ok(())
    }

    fn resolve_handler(
        &self,
        source_type: SourceType,
        source_key: &SourceKey,
    ) -> Result<Option<Arc<dyn OracleHandler>>> {
        let registry = self
            .registry
            .read()
            .map_err(|e| OracleError::InvalidOperation(format!("registry lock poisoned: {e}")))?;
        Ok(registry.resolve(source_type, source_key))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writer Surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Admit one entry: validate ordering, dispatch, persist.
    ///
    /// The cursor is advanced and persisted *before* the handler runs
    /// (checks-effects-interactions), so a re-entrant admission attempt from
    /// inside the handler sees the post-admission cursor and cannot replay
    /// this sequence. Handler failures are absorbed; the only fatal errors
    /// are ordering violations, oversized payloads, authorization, and
    /// storage faults - none of which invoke the handler.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        token: &RelayerToken,
        source_type: SourceType,
        source_id: SourceId,
        sequence: u64,
        payload: &[u8],
        budget: u64,
        mode: StorageMode,
    ) -> Result<Admission> {
        self.authorize_relayer(token)?;
        self.check_payload(payload)?;

        let source_key = SourceKey::derive(source_type, source_id);
        let now = now_millis();

        let mut cursor = self
            .store
            .get_cursor(&source_key)
            .await?
            .unwrap_or_else(|| SourceCursor::new(source_key, now));

        // Fatal on violation; nothing has been written yet.
        cursor.advance(self.config.ordering, sequence, now)?;
        self.store.upsert_cursor(&cursor).await?;

        let payload_hash = PayloadHash::digest(payload);
        self.events.emit(LedgerEvent::EntryAdmitted {
            source_key,
            sequence,
            payload_hash,
        });

        self.dispatch_and_persist(source_type, source_id, source_key, sequence, payload, budget, mode, now)
            .await
    }

    /// Admit an ordered batch of same-source entries as one atomic unit.
    ///
    /// Shape and ordering are validated for the whole batch before any
    /// effect, so every rejection leaves the ledger untouched. Each entry is
    /// then admitted exactly as a single [`NativeOracle::record`] call would
    /// be: its own budget, its own dispatch, its own persistence decision.
    /// The final state is indistinguishable from N single calls.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_batch(
        &self,
        token: &RelayerToken,
        source_type: SourceType,
        source_id: SourceId,
        sequences: &[u64],
        payloads: &[Bytes],
        budgets: &[u64],
        mode: StorageMode,
    ) -> Result<Vec<Admission>> {
        self.authorize_relayer(token)?;

        if sequences.len() != payloads.len() || sequences.len() != budgets.len() {
            return Err(OracleError::BatchShape {
                sequences: sequences.len(),
                payloads: payloads.len(),
                budgets: budgets.len(),
            });
        }
        for payload in payloads {
            self.check_payload(payload)?;
        }

        let source_key = SourceKey::derive(source_type, source_id);
        let now = now_millis();

        let mut cursor = self
            .store
            .get_cursor(&source_key)
            .await?
            .unwrap_or_else(|| SourceCursor::new(source_key, now));

        // Whole-batch validation before any mutation: an invalid chain
        // anywhere aborts with no partial admission.
        validate_batch(self.config.ordering, cursor.latest_sequence, sequences)?;

        debug!(
            %source_key,
            entries = sequences.len(),
            "batch validated, admitting"
        );

        let mut admissions = Vec::with_capacity(sequences.len());
        for ((&sequence, payload), &budget) in
            sequences.iter().zip(payloads.iter()).zip(budgets.iter())
        {
            cursor.advance(self.config.ordering, sequence, now)?;
            self.store.upsert_cursor(&cursor).await?;

            let payload_hash = PayloadHash::digest(payload);
            self.events.emit(LedgerEvent::EntryAdmitted {
                source_key,
                sequence,
                payload_hash,
            });

            let admission = self
                .dispatch_and_persist(
                    source_type,
                    source_id,
                    source_key,
                    sequence,
                    payload,
                    budget,
                    mode,
                    now,
                )
                .await?;
            admissions.push(admission);
        }

        Ok(admissions)
    }

    /// Steps 3-5 of an admission: resolve, dispatch, persist or skip.
    ///
    /// Called with the cursor already advanced and persisted.
    #[allow(clippy::too_many_arguments)]
    async fn dispatch_and_persist(
        &self,
        source_type: SourceType,
        source_id: SourceId,
        source_key: SourceKey,
        sequence: u64,
        payload: &[u8],
        budget: u64,
        mode: StorageMode,
        now: i64,
    ) -> Result<Admission> {
        let handler = self.resolve_handler(source_type, &source_key)?;
        let delivery = Delivery {
            source_type,
            source_id,
            source_key,
            sequence,
            payload,
        };
        let outcome = dispatch(handler.as_ref(), delivery, budget);

        match &outcome.status {
            DispatchStatus::Delivered => self.events.emit(LedgerEvent::HandlerSucceeded {
                source_key,
                sequence,
                decision: outcome.decision,
            }),
            DispatchStatus::Absorbed(failure) => self.events.emit(LedgerEvent::HandlerFailed {
                source_key,
                sequence,
                reason: failure.to_string(),
            }),
            DispatchStatus::NotInvoked => {}
        }

        let payload_hash = match outcome.decision {
            Decision::Store => {
                let record = Record::admit(source_key, sequence, payload, mode, now);
                let hash = record.payload_hash;
                self.store.insert_record(&record).await?;
                hash
            }
            Decision::Skip => {
                self.events.emit(LedgerEvent::StorageSkipped {
                    source_key,
                    sequence,
                });
                PayloadHash::digest(payload)
            }
        };

        Ok(Admission {
            source_key,
            sequence,
            payload_hash,
            decision: outcome.decision,
            dispatch: outcome.status,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Governance Surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind or clear the default handler for a source type.
    pub fn set_default_callback(
        &self,
        token: &GovernanceToken,
        source_type: SourceType,
        handler: Option<Arc<dyn OracleHandler>>,
    ) -> Result<()> {
        self.authorize_governance(token)?;
        let cleared = handler.is_none();
        {
            let mut registry = self.registry.write().map_err(|e| {
                OracleError::InvalidOperation(format!("registry lock poisoned: {e}"))
            })?;
            registry.set_default(source_type, handler);
        }
        self.events.emit(LedgerEvent::CallbackChanged {
            scope: CallbackScope::Default(source_type),
            cleared,
        });
        Ok(())
    }

    /// Bind or clear the override handler for one source.
    pub fn set_callback(
        &self,
        token: &GovernanceToken,
        source_key: SourceKey,
        handler: Option<Arc<dyn OracleHandler>>,
    ) -> Result<()> {
        self.authorize_governance(token)?;
        let cleared = handler.is_none();
        {
            let mut registry = self.registry.write().map_err(|e| {
                OracleError::InvalidOperation(format!("registry lock poisoned: {e}"))
            })?;
            registry.set_override(source_key, handler);
        }
        self.events.emit(LedgerEvent::CallbackChanged {
            scope: CallbackScope::Source(source_key),
            cleared,
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Highest admitted sequence for a source, 0 if none.
    pub async fn latest_nonce(&self, source_key: &SourceKey) -> Result<u64> {
        Ok(self
            .store
            .get_cursor(source_key)
            .await?
            .map(|cursor| cursor.latest_sequence)
            .unwrap_or(0))
    }

    /// Cursor value plus whether the source was ever written.
    pub async fn sync_status(&self, source_key: &SourceKey) -> Result<SyncStatus> {
        let cursor = self.store.get_cursor(source_key).await?;
        Ok(match cursor {
            Some(cursor) => SyncStatus {
                latest_sequence: cursor.latest_sequence,
                initialized: cursor.is_initialized(),
            },
            None => SyncStatus {
                latest_sequence: 0,
                initialized: false,
            },
        })
    }

    /// Whether the source's cursor has reached `threshold`.
    pub async fn is_synced_past(&self, source_key: &SourceKey, threshold: u64) -> Result<bool> {
        Ok(self.latest_nonce(source_key).await? >= threshold)
    }

    /// The record admitted at `(source_key, sequence)`, if one was stored.
    pub async fn get_record(
        &self,
        source_key: &SourceKey,
        sequence: u64,
    ) -> Result<Option<Record>> {
        Ok(self.store.get_record_at(source_key, sequence).await?)
    }

    /// Existence and metadata lookup by content hash.
    pub async fn verify_hash(&self, hash: &PayloadHash) -> Result<Option<Record>> {
        Ok(self.store.get_record(hash).await?)
    }

    /// Recompute the content hash of `candidate` and look it up.
    ///
    /// Pure content addressing: equivalent to `verify_hash(digest(candidate))`.
    pub async fn verify_pre_image(&self, candidate: &[u8]) -> Result<Option<Record>> {
        self.verify_hash(&PayloadHash::digest(candidate)).await
    }

    /// The stored payload for a hash; empty if admitted commitment-only or
    /// if the hash is unknown.
    pub async fn get_data(&self, hash: &PayloadHash) -> Result<Bytes> {
        Ok(self.store.get_payload(hash).await?.unwrap_or_default())
    }

    /// Number of distinct payloads ever stored.
    pub async fn record_count(&self) -> Result<u64> {
        Ok(self.store.record_count().await?)
    }

    /// Every source with a cursor.
    pub async fn list_sources(&self) -> Result<Vec<SourceKey>> {
        Ok(self.store.list_sources().await?)
    }

    /// The override handler bound to a source, if any.
    pub fn get_callback(&self, source_key: &SourceKey) -> Result<Option<Arc<dyn OracleHandler>>> {
        let registry = self
            .registry
            .read()
            .map_err(|e| OracleError::InvalidOperation(format!("registry lock poisoned: {e}")))?;
        Ok(registry.override_for(source_key))
    }

    /// The default handler bound to a source type, if any.
    pub fn get_default_callback(
        &self,
        source_type: SourceType,
    ) -> Result<Option<Arc<dyn OracleHandler>>> {
        let registry = self
            .registry
            .read()
            .map_err(|e| OracleError::InvalidOperation(format!("registry lock poisoned: {e}")))?;
        Ok(registry.default_for(source_type))
    }

    /// The handler an admission from this source would dispatch to.
    pub fn resolve_callback(
        &self,
        source_type: SourceType,
        source_id: SourceId,
    ) -> Result<Option<Arc<dyn OracleHandler>>> {
        let source_key = SourceKey::derive(source_type, source_id);
        self.resolve_handler(source_type, &source_key)
    }

    /// Snapshot of the telemetry log.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.snapshot()
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
