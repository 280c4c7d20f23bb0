//! The handler seam: the fixed-signature interface collaborators implement.
//!
//! A handler is a bridge message receiver, a signing-key-set manager, a
//! generic event router - any code that wants to react to admitted entries.
//! The ledger trusts nothing about it beyond this signature.

use std::fmt;

use native_oracle_core::{SourceId, SourceKey, SourceType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::budget::{Budget, BudgetExceeded};

/// An admitted entry as handed to a handler.
///
/// Borrowed view: handlers that need the payload beyond the invocation must
/// copy it.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    pub source_type: SourceType,
    pub source_id: SourceId,
    pub source_key: SourceKey,
    pub sequence: u64,
    pub payload: &'a [u8],
}

/// The handler's persistence decision for an admitted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Persist the entry (per the admission call's storage mode).
    Store,
    /// Advance the cursor but persist nothing.
    Skip,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Store => write!(f, "store"),
            Decision::Skip => write!(f, "skip"),
        }
    }
}

/// Errors a handler may surface.
///
/// All of these are absorbed by the engine; they exist so handlers can use
/// `?` internally and so failure events carry a reason.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// The invocation's fuel budget ran out.
    #[error(transparent)]
    Budget(#[from] BudgetExceeded),

    /// Any other handler-side failure.
    #[error("handler failed: {0}")]
    Failed(String),
}

impl HandlerError {
    /// Convenience constructor for ad-hoc failures.
    pub fn failed(reason: impl Into<String>) -> Self {
        HandlerError::Failed(reason.into())
    }
}

/// A registered callback, invoked synchronously on every admission that
/// resolves to it.
///
/// The single entry point receives the admitted entry and the invocation's
/// fuel budget, and returns the persistence decision. Implementations must
/// not assume they outlive the invocation; state they need to keep goes
/// behind their own synchronization.
pub trait OracleHandler: Send + Sync {
    fn on_delivery(
        &self,
        delivery: Delivery<'_>,
        budget: &mut Budget,
    ) -> Result<Decision, HandlerError>;
}
