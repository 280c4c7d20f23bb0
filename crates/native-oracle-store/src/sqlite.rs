//! SQLite implementation of the Store trait.
//!
//! This is the primary durable backend for the Native Oracle ledger. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use native_oracle_core::{PayloadHash, Record, SourceCursor, SourceKey};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertOutcome, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation against the connection off the async runtime.
    async fn on_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }
}

// Helper to convert a row to Record
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let hash_bytes: Vec<u8> = row.get("payload_hash")?;
    let source_key_bytes: Vec<u8> = row.get("source_key")?;
    let payload: Vec<u8> = row.get("payload")?;

    Ok(Record {
        payload_hash: PayloadHash::from_bytes(hash_bytes.try_into().map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                0,
                "payload_hash".into(),
                rusqlite::types::Type::Blob,
            )
        })?),
        source_key: SourceKey::from_bytes(source_key_bytes.try_into().map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "source_key".into(), rusqlite::types::Type::Blob)
        })?),
        // Sequences are written with `as i64`, so values above i64::MAX come
        // back negative; the symmetric cast recovers the full u64 range.
        sequence: row.get::<_, i64>("sequence")? as u64,
        admitted_at: row.get("admitted_at")?,
        payload: Bytes::from(payload),
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_record(&self, record: &Record) -> Result<InsertOutcome> {
        let record = record.clone();

        self.on_conn(move |conn| {
            // Either slot can map to this content from now on.
            conn.execute(
                "INSERT OR REPLACE INTO positions (source_key, sequence, payload_hash)
                 VALUES (?1, ?2, ?3)",
                params![
                    record.source_key.as_bytes().as_slice(),
                    record.sequence as i64,
                    record.payload_hash.as_bytes().as_slice(),
                ],
            )?;

            let exists: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM records WHERE payload_hash = ?1",
                    params![record.payload_hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;

            if exists.is_some() {
                // Known content: refresh slot metadata, leave payload alone.
                conn.execute(
                    "UPDATE records SET source_key = ?2, sequence = ?3, admitted_at = ?4
                     WHERE payload_hash = ?1",
                    params![
                        record.payload_hash.as_bytes().as_slice(),
                        record.source_key.as_bytes().as_slice(),
                        record.sequence as i64,
                        record.admitted_at,
                    ],
                )?;
                return Ok(InsertOutcome::Refreshed);
            }

            conn.execute(
                "INSERT INTO records (payload_hash, source_key, sequence, admitted_at, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.payload_hash.as_bytes().as_slice(),
                    record.source_key.as_bytes().as_slice(),
                    record.sequence as i64,
                    record.admitted_at,
                    record.payload.as_ref(),
                ],
            )?;

            Ok(InsertOutcome::Inserted)
        })
        .await
    }

    async fn get_record(&self, hash: &PayloadHash) -> Result<Option<Record>> {
        let hash = *hash;

        self.on_conn(move |conn| {
            let record = conn
                .query_row(
                    "SELECT payload_hash, source_key, sequence, admitted_at, payload
                     FROM records WHERE payload_hash = ?1",
                    params![hash.as_bytes().as_slice()],
                    row_to_record,
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn get_record_at(
        &self,
        source_key: &SourceKey,
        sequence: u64,
    ) -> Result<Option<Record>> {
        let source_key = *source_key;

        self.on_conn(move |conn| {
            let record = conn
                .query_row(
                    "SELECT r.payload_hash, r.source_key, r.sequence, r.admitted_at, r.payload
                     FROM positions p JOIN records r ON r.payload_hash = p.payload_hash
                     WHERE p.source_key = ?1 AND p.sequence = ?2",
                    params![source_key.as_bytes().as_slice(), sequence as i64],
                    row_to_record,
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn has_record(&self, hash: &PayloadHash) -> Result<bool> {
        let hash = *hash;

        self.on_conn(move |conn| {
            let exists: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM records WHERE payload_hash = ?1",
                    params![hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(exists.is_some())
        })
        .await
    }

    async fn get_payload(&self, hash: &PayloadHash) -> Result<Option<Bytes>> {
        let hash = *hash;

        self.on_conn(move |conn| {
            let payload: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT payload FROM records WHERE payload_hash = ?1",
                    params![hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(payload.map(Bytes::from))
        })
        .await
    }

    async fn record_count(&self) -> Result<u64> {
        self.on_conn(move |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn get_cursor(&self, source_key: &SourceKey) -> Result<Option<SourceCursor>> {
        let source_key = *source_key;

        self.on_conn(move |conn| {
            let cursor = conn
                .query_row(
                    "SELECT source_key, latest_sequence, records_admitted, created_at, updated_at
                     FROM source_cursors WHERE source_key = ?1",
                    params![source_key.as_bytes().as_slice()],
                    |row| {
                        let key_bytes: Vec<u8> = row.get("source_key")?;
                        Ok(SourceCursor {
                            source_key: SourceKey::from_bytes(key_bytes.try_into().map_err(
                                |_| {
                                    rusqlite::Error::InvalidColumnType(
                                        0,
                                        "source_key".into(),
                                        rusqlite::types::Type::Blob,
                                    )
                                },
                            )?),
                            latest_sequence: row.get::<_, i64>("latest_sequence")? as u64,
                            records_admitted: row.get::<_, i64>("records_admitted")? as u64,
                            created_at: row.get("created_at")?,
                            updated_at: row.get("updated_at")?,
                        })
                    },
                )
                .optional()?;
            Ok(cursor)
        })
        .await
    }

    async fn upsert_cursor(&self, cursor: &SourceCursor) -> Result<()> {
        let cursor = cursor.clone();

        self.on_conn(move |conn| {
            conn.execute(
                "INSERT INTO source_cursors
                     (source_key, latest_sequence, records_admitted, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(source_key) DO UPDATE SET
                     latest_sequence = excluded.latest_sequence,
                     records_admitted = excluded.records_admitted,
                     updated_at = excluded.updated_at",
                params![
                    cursor.source_key.as_bytes().as_slice(),
                    cursor.latest_sequence as i64,
                    cursor.records_admitted as i64,
                    cursor.created_at,
                    cursor.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_sources(&self) -> Result<Vec<SourceKey>> {
        self.on_conn(move |conn| {
            let mut stmt = conn.prepare("SELECT source_key FROM source_cursors")?;
            let keys = stmt
                .query_map([], |row| {
                    let bytes: Vec<u8> = row.get(0)?;
                    Ok(bytes)
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            keys.into_iter()
                .map(|bytes| {
                    SourceKey::try_from(bytes.as_slice())
                        .map_err(|_| StoreError::InvalidData("source_key not 32 bytes".into()))
                })
                .collect()
        })
        .await
    }
}
