//! # Native Oracle Dispatch
//!
//! The two-level callback registry and the failure-absorbing dispatch
//! engine: the only place where control leaves the ledger and enters
//! arbitrary third-party code.
//!
//! ## Key Types
//!
//! - [`OracleHandler`] - The single-entry-point trait collaborators implement
//! - [`CallbackRegistry`] - Per-type defaults plus per-source overrides
//! - [`Budget`] - Explicit fuel budget bounding a handler invocation
//! - [`dispatch`] - The sandboxed invocation itself
//!
//! ## Fail-safe store
//!
//! A handler decides whether the ledger persists a payload. Whenever that
//! decision cannot be trusted - the handler panicked, errored, or ran out
//! of budget - the engine absorbs the failure and defaults to
//! [`Decision::Store`]. Durability is the fail-safe; silent data loss is
//! never an acceptable failure mode.

pub mod budget;
pub mod engine;
pub mod handler;
pub mod registry;

pub use budget::{Budget, BudgetExceeded};
pub use engine::{dispatch, DispatchFailure, DispatchOutcome, DispatchStatus};
pub use handler::{Decision, Delivery, HandlerError, OracleHandler};
pub use registry::CallbackRegistry;
