use std::collections::BTreeMap;
use std::sync::Arc;

use crate::logging::{DebugLogger, DebugLogs, TracingDebugLogger};
use crate::registry::EntityTarget;

/// Configuration fixed at adapter construction.
///
/// The database connection itself is not part of it: the caller owns an
/// already-initialized connection and hands it to the repository source.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Map model `user` to table `users`, and so on.
    pub use_plural: bool,
    pub debug_logs: DebugLogs,
    pub debug_logger: Arc<dyn DebugLogger>,
    /// Per-model table overrides.
    pub entities: BTreeMap<String, EntityTarget>,
    /// Models beyond the core four, e.g. ones added by framework plugins.
    pub models: Vec<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            use_plural: false,
            debug_logs: DebugLogs::Disabled,
            debug_logger: Arc::new(TracingDebugLogger),
            entities: BTreeMap::new(),
            models: Vec::new(),
        }
    }
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_use_plural(mut self, use_plural: bool) -> Self {
        self.use_plural = use_plural;
        self
    }

    pub fn with_debug_logs(mut self, debug_logs: impl Into<DebugLogs>) -> Self {
        self.debug_logs = debug_logs.into();
        self
    }

    pub fn with_debug_logger(mut self, logger: Arc<dyn DebugLogger>) -> Self {
        self.debug_logger = logger;
        self
    }

    pub fn with_entity(mut self, model: impl Into<String>, target: EntityTarget) -> Self {
        self.entities.insert(model.into(), target);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !self.models.contains(&model) {
            self.models.push(model);
        }
        self
    }
}
