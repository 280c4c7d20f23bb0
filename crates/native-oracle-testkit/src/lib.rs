//! # Native Oracle Testkit
//!
//! Testing utilities for the Native Oracle.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: an oracle over a memory store with its tokens in hand
//! - **Stub handlers**: fixed-decision, failing, panicking, fuel-hungry,
//!   and recording implementations of `OracleHandler`
//! - **Generators**: proptest strategies for payloads and sequence chains
//!
//! ## Fixtures
//!
//! ```rust
//! use native_oracle_testkit::fixtures::OracleFixture;
//!
//! # async fn example() {
//! let fixture = OracleFixture::new();
//! let admission = fixture.record_simple(0, 1, 1, b"payload").await.unwrap();
//! assert_eq!(admission.sequence, 1);
//! # }
//! ```
//!
//! ## Stub handlers
//!
//! ```rust
//! use std::sync::Arc;
//! use native_oracle::{Decision, OracleHandler};
//! use native_oracle_testkit::handlers::{FixedHandler, RecordingHandler};
//!
//! let always_skip: Arc<dyn OracleHandler> = Arc::new(FixedHandler::new(Decision::Skip));
//! let recording = Arc::new(RecordingHandler::new(Decision::Store));
//! ```
//!
//! ## Property testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use native_oracle_testkit::generators::ascending_sequences;
//!
//! proptest! {
//!     #[test]
//!     fn admits_any_ascending_chain(chain in ascending_sequences(0, 16)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod handlers;
pub mod vectors;

pub use fixtures::OracleFixture;
pub use generators::{ascending_sequences, contiguous_sequences, payload_bytes};
pub use handlers::{
    FixedHandler, HungryHandler, PanickingHandler, RecordingHandler, RevertingHandler,
};
pub use vectors::{all_vectors, generate_vector, verify_all_vectors, DerivationVector};
