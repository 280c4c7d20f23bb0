//! Two-level callback bindings.
//!
//! Resolution order: per-source override first, then the per-type default,
//! else none. Both levels are plain hash maps, so resolution is O(1) on
//! every admission.

use std::collections::HashMap;
use std::sync::Arc;

use native_oracle_core::{SourceKey, SourceType};

use crate::handler::OracleHandler;

/// The mutable binding state: per-type defaults and per-source overrides.
///
/// Mutated only through the governance surface; clearing a binding never
/// retroactively affects already-admitted records.
#[derive(Default)]
pub struct CallbackRegistry {
    defaults: HashMap<SourceType, Arc<dyn OracleHandler>>,
    overrides: HashMap<SourceKey, Arc<dyn OracleHandler>>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or clear the default handler for a source type.
    pub fn set_default(&mut self, source_type: SourceType, handler: Option<Arc<dyn OracleHandler>>) {
        match handler {
            Some(handler) => {
                self.defaults.insert(source_type, handler);
            }
            None => {
                self.defaults.remove(&source_type);
            }
        }
    }

    /// Bind or clear the override handler for a single source.
    pub fn set_override(&mut self, source_key: SourceKey, handler: Option<Arc<dyn OracleHandler>>) {
        match handler {
            Some(handler) => {
                self.overrides.insert(source_key, handler);
            }
            None => {
                self.overrides.remove(&source_key);
            }
        }
    }

    /// The default handler bound to a source type, if any.
    pub fn default_for(&self, source_type: SourceType) -> Option<Arc<dyn OracleHandler>> {
        self.defaults.get(&source_type).cloned()
    }

    /// The override handler bound to a source, if any.
    pub fn override_for(&self, source_key: &SourceKey) -> Option<Arc<dyn OracleHandler>> {
        self.overrides.get(source_key).cloned()
    }

    /// Resolve the handler for an admission: override first, else default.
    pub fn resolve(
        &self,
        source_type: SourceType,
        source_key: &SourceKey,
    ) -> Option<Arc<dyn OracleHandler>> {
        self.override_for(source_key)
            .or_else(|| self.default_for(source_type))
    }
}
