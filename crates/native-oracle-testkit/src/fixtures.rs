//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use native_oracle::{
    Admission, GovernanceToken, NativeOracle, OracleConfig, OracleHandler, RelayerToken,
    StorageMode,
};
use native_oracle_core::{SourceId, SourceKey, SourceType};
use native_oracle_store::MemoryStore;

/// An oracle over a memory store, with both role tokens in hand.
pub struct OracleFixture {
    pub oracle: NativeOracle<MemoryStore>,
    pub relayer: RelayerToken,
    pub governance: GovernanceToken,
}

impl OracleFixture {
    /// Oracle with the default configuration (strictly-increasing ordering).
    pub fn new() -> Self {
        Self::with_config(OracleConfig::default())
    }

    /// Oracle with a custom configuration.
    pub fn with_config(config: OracleConfig) -> Self {
        let (oracle, relayer, governance) = NativeOracle::new(MemoryStore::new(), config);
        Self {
            oracle,
            relayer,
            governance,
        }
    }

    /// Oracle with default bindings seeded at construction.
    pub fn with_bindings(bindings: Vec<(SourceType, Arc<dyn OracleHandler>)>) -> Self {
        let (oracle, relayer, governance) =
            NativeOracle::with_bindings(MemoryStore::new(), OracleConfig::default(), bindings);
        Self {
            oracle,
            relayer,
            governance,
        }
    }

    /// Derive the source key for raw type/id values.
    pub fn source_key(&self, source_type: u32, source_id: u64) -> SourceKey {
        SourceKey::derive(SourceType(source_type), SourceId(source_id))
    }

    /// Record one full-mode entry with a generous budget.
    pub async fn record_simple(
        &self,
        source_type: u32,
        source_id: u64,
        sequence: u64,
        payload: &[u8],
    ) -> native_oracle::Result<Admission> {
        self.oracle
            .record(
                &self.relayer,
                SourceType(source_type),
                SourceId(source_id),
                sequence,
                payload,
                10_000,
                StorageMode::Full,
            )
            .await
    }

    /// Bind a type-default handler through the governance surface.
    pub fn bind_default(
        &self,
        source_type: u32,
        handler: Arc<dyn OracleHandler>,
    ) -> native_oracle::Result<()> {
        self.oracle
            .set_default_callback(&self.governance, SourceType(source_type), Some(handler))
    }

    /// Bind a per-source override through the governance surface.
    pub fn bind_override(
        &self,
        source_type: u32,
        source_id: u64,
        handler: Arc<dyn OracleHandler>,
    ) -> native_oracle::Result<()> {
        self.oracle.set_callback(
            &self.governance,
            self.source_key(source_type, source_id),
            Some(handler),
        )
    }
}

impl Default for OracleFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::RecordingHandler;
    use native_oracle::Decision;

    #[tokio::test]
    async fn test_fixture_records_and_queries() {
        let fixture = OracleFixture::new();
        fixture.record_simple(0, 1, 1, b"payload").await.unwrap();

        let key = fixture.source_key(0, 1);
        assert_eq!(fixture.oracle.latest_nonce(&key).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fixture_bindings_reach_handlers() {
        let recording = Arc::new(RecordingHandler::new(Decision::Store));
        let fixture = OracleFixture::new();
        fixture.bind_default(0, recording.clone()).unwrap();

        fixture.record_simple(0, 1, 1, b"payload").await.unwrap();
        assert_eq!(recording.delivery_count(), 1);
    }
}
