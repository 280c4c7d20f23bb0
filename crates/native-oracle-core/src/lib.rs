//! # Native Oracle Core
//!
//! Pure primitives for the Native Oracle ledger: source keys, per-source
//! cursors, ordering rules, and admitted records.
//!
//! This crate contains no I/O, no storage, no dispatch. It is pure
//! computation over the ledger's data model.
//!
//! ## Key Types
//!
//! - [`SourceKey`] - Canonical identifier derived from `(SourceType, SourceId)`
//! - [`SourceCursor`] - Per-source monotonic sequence tracker
//! - [`OrderingRule`] - The admission rule a cursor is advanced under
//! - [`Record`] - A content-addressed admitted entry
//! - [`PayloadHash`] - Blake3 content address of a payload
//!
//! ## Ordering
//!
//! Two admission rules are supported: strictly-increasing (gaps allowed) and
//! gap-free (contiguous). Both are expressed explicitly as [`OrderingRule`]
//! variants; callers pick one at construction time. See [`ordering`].

pub mod error;
pub mod hash;
pub mod ordering;
pub mod record;
pub mod source;
pub mod validation;

pub use error::OrderingError;
pub use hash::PayloadHash;
pub use ordering::OrderingRule;
pub use record::{Record, StorageMode};
pub use source::{SourceCursor, SourceId, SourceKey, SourceType};
pub use validation::{validate_batch, validate_sequence};
