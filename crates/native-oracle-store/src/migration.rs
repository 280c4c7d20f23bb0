//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Get current version
    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Apply migrations
    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Records table: content-addressed entries, one row per distinct hash
        CREATE TABLE records (
            payload_hash BLOB PRIMARY KEY,    -- 32 bytes, Blake3 hash of payload
            source_key BLOB NOT NULL,         -- 32 bytes, most recent admitting source
            sequence INTEGER NOT NULL,        -- most recent admission sequence
            admitted_at INTEGER NOT NULL,     -- most recent admission (Unix ms)
            payload BLOB NOT NULL             -- raw payload; empty in commitment mode
        );

        -- Position index: which content occupies (source, sequence)
        CREATE TABLE positions (
            source_key BLOB NOT NULL,
            sequence INTEGER NOT NULL,
            payload_hash BLOB NOT NULL,
            PRIMARY KEY (source_key, sequence)
        );

        -- Per-source cursors
        CREATE TABLE source_cursors (
            source_key BLOB PRIMARY KEY,
            latest_sequence INTEGER NOT NULL DEFAULT 0,
            records_admitted INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Indexes for common queries
        CREATE INDEX idx_records_source ON records(source_key);
        CREATE INDEX idx_records_admitted ON records(admitted_at);
        CREATE INDEX idx_positions_hash ON positions(payload_hash);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        // Verify tables exist
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"records".to_string()));
        assert!(tables.contains(&"positions".to_string()));
        assert!(tables.contains(&"source_cursors".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap(); // Should not error
        migrate(&mut conn).unwrap(); // Still should not error

        // Verify version is 1
        let version: u32 = conn
            .query_row(
                "SELECT MAX(version) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, 1);
    }
}
