//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite but
//! keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use native_oracle_core::{PayloadHash, Record, SourceCursor, SourceKey};

use crate::error::{Result, StoreError};
use crate::traits::{InsertOutcome, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records indexed by content hash.
    records: HashMap<PayloadHash, Record>,

    /// Position index: (source_key, sequence) -> content hash.
    positions: HashMap<(SourceKey, u64), PayloadHash>,

    /// Per-source cursors.
    cursors: HashMap<SourceKey, SourceCursor>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                records: HashMap::new(),
                positions: HashMap::new(),
                cursors: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_record(&self, record: &Record) -> Result<InsertOutcome> {
        let mut inner = self.write()?;

        inner
            .positions
            .insert((record.source_key, record.sequence), record.payload_hash);

        match inner.records.get_mut(&record.payload_hash) {
            Some(existing) => {
                existing.refresh(record.source_key, record.sequence, record.admitted_at);
                Ok(InsertOutcome::Refreshed)
            }
            None => {
                inner.records.insert(record.payload_hash, record.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get_record(&self, hash: &PayloadHash) -> Result<Option<Record>> {
        let inner = self.read()?;
        Ok(inner.records.get(hash).cloned())
    }

    async fn get_record_at(
        &self,
        source_key: &SourceKey,
        sequence: u64,
    ) -> Result<Option<Record>> {
        let inner = self.read()?;

        if let Some(hash) = inner.positions.get(&(*source_key, sequence)) {
            Ok(inner.records.get(hash).cloned())
        } else {
            Ok(None)
        }
    }

    async fn has_record(&self, hash: &PayloadHash) -> Result<bool> {
        let inner = self.read()?;
        Ok(inner.records.contains_key(hash))
    }

    async fn get_payload(&self, hash: &PayloadHash) -> Result<Option<Bytes>> {
        let inner = self.read()?;
        Ok(inner.records.get(hash).map(|r| r.payload.clone()))
    }

    async fn record_count(&self) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner.records.len() as u64)
    }

    async fn get_cursor(&self, source_key: &SourceKey) -> Result<Option<SourceCursor>> {
        let inner = self.read()?;
        Ok(inner.cursors.get(source_key).cloned())
    }

    async fn upsert_cursor(&self, cursor: &SourceCursor) -> Result<()> {
        let mut inner = self.write()?;
        inner.cursors.insert(cursor.source_key, cursor.clone());
        Ok(())
    }

    async fn list_sources(&self) -> Result<Vec<SourceKey>> {
        let inner = self.read()?;
        Ok(inner.cursors.keys().copied().collect())
    }
}
