//! # Native Oracle
//!
//! The unified API for the Native Oracle - a single-writer, append-only
//! event ledger with synchronous, failure-isolated dispatch.
//!
//! ## Overview
//!
//! A privileged relayer delivers externally-observed data (cross-chain
//! events, signed key-set updates, price feeds) tagged by
//! `(source_type, source_id)`. The ledger:
//!
//! - **admits** each entry under a strict per-source ordering rule,
//! - **dispatches** it synchronously to a registered handler under a fuel
//!   budget, absorbing any handler failure,
//! - **persists** or discards the payload based on the handler's decision,
//!   with `Store` as the fail-safe.
//!
//! ## Key Concepts
//!
//! - **Source**: an external producer, canonicalized to a [`SourceKey`].
//! - **Cursor**: the per-source monotonic sequence; ordering violations are
//!   fatal and mutate nothing.
//! - **Handler**: arbitrary third-party code behind [`OracleHandler`]; its
//!   failures never corrupt or block the ledger.
//! - **Capabilities**: the writer and governance roles are unforgeable
//!   tokens issued at construction, not ambient authority.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use native_oracle::{NativeOracle, OracleConfig, StorageMode};
//! use native_oracle::store::SqliteStore;
//! use native_oracle::core::{SourceId, SourceType};
//!
//! async fn example() {
//!     let store = SqliteStore::open("oracle.db").unwrap();
//!     let (oracle, relayer, _governance) =
//!         NativeOracle::new(store, OracleConfig::default());
//!
//!     let admission = oracle
//!         .record(
//!             &relayer,
//!             SourceType(0),
//!             SourceId(1),
//!             1,
//!             b"observed event",
//!             10_000,
//!             StorageMode::Full,
//!         )
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(admission.sequence, 1);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `native_oracle::core` - Primitives (SourceKey, cursors, records)
//! - `native_oracle::store` - Storage abstraction and SQLite
//! - `native_oracle::dispatch` - Registry, budgets, dispatch engine

pub mod auth;
pub mod error;
pub mod events;
pub mod oracle;

// Re-export component crates
pub use native_oracle_core as core;
pub use native_oracle_dispatch as dispatch;
pub use native_oracle_store as store;

// Re-export main types for convenience
pub use auth::{GovernanceToken, RelayerToken};
pub use error::{OracleError, Result};
pub use events::{CallbackScope, EventLog, LedgerEvent};
pub use oracle::{Admission, NativeOracle, OracleConfig, SyncStatus};

// Re-export commonly used component types
pub use native_oracle_core::{
    OrderingRule, PayloadHash, Record, SourceCursor, SourceId, SourceKey, SourceType, StorageMode,
};
pub use native_oracle_dispatch::{
    Budget, Decision, Delivery, DispatchFailure, DispatchStatus, HandlerError, OracleHandler,
};
