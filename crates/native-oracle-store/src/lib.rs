//! # Native Oracle Store
//!
//! Storage abstraction for the Native Oracle ledger. Provides a trait-based
//! interface over per-source cursors and content-addressed records, with
//! SQLite and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all ledger persistence
//! - [`SqliteStore`] - SQLite-based durable storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertOutcome`] - Whether an insert was first-sight or a refresh
//!
//! ## Design Notes
//!
//! - **Content-addressed records**: a record lives under the Blake3 hash of
//!   its payload. Re-inserting an existing hash refreshes slot metadata and
//!   returns [`InsertOutcome::Refreshed`] without touching the global count.
//! - **Append-only**: records, positions, and cursors are never deleted.
//! - **Position index**: every insert also maps `(source_key, sequence)` to
//!   the content hash, so slot lookups need no scan.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertOutcome, Store};
