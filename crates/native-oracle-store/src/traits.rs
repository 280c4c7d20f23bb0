//! Store trait: the abstract interface for ledger persistence.
//!
//! This trait keeps the oracle service storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;
use native_oracle_core::{PayloadHash, Record, SourceCursor, SourceKey};

use crate::error::Result;

/// Result of inserting a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First sight of this content hash. The global record count grew.
    Inserted,
    /// The hash already existed; slot metadata was refreshed, content and
    /// the global record count untouched.
    Refreshed,
}

/// The Store trait: async interface for ledger persistence.
///
/// # Design Notes
///
/// - **Content-addressed upsert**: [`Store::insert_record`] keys on the
///   payload hash. A known hash becomes a metadata refresh, never a second
///   row and never a second count.
/// - **Position index**: every insert also records
///   `(source_key, sequence) -> hash` so slot lookups are direct.
/// - **Append-only**: nothing is ever deleted; cursors only move forward.
///   The ordering decision itself lives above the store, in the service.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a record, or refresh slot metadata if its hash is known.
    ///
    /// A refresh keeps the stored payload as-is: a commitment-only
    /// re-admission never erases bytes a full-mode admission persisted.
    async fn insert_record(&self, record: &Record) -> Result<InsertOutcome>;

    /// Get a record by its content hash.
    async fn get_record(&self, hash: &PayloadHash) -> Result<Option<Record>>;

    /// Get the record admitted at `(source_key, sequence)`, if any.
    async fn get_record_at(&self, source_key: &SourceKey, sequence: u64)
        -> Result<Option<Record>>;

    /// Check whether a content hash exists.
    async fn has_record(&self, hash: &PayloadHash) -> Result<bool>;

    /// Get the stored payload for a hash.
    ///
    /// `None` if the hash is unknown; empty bytes if the record was admitted
    /// in commitment-only mode.
    async fn get_payload(&self, hash: &PayloadHash) -> Result<Option<Bytes>>;

    /// Number of distinct content hashes ever inserted.
    async fn record_count(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the cursor for a source.
    async fn get_cursor(&self, source_key: &SourceKey) -> Result<Option<SourceCursor>>;

    /// Update or insert a cursor.
    async fn upsert_cursor(&self, cursor: &SourceCursor) -> Result<()>;

    /// List every source that has a cursor.
    async fn list_sources(&self) -> Result<Vec<SourceKey>>;
}
