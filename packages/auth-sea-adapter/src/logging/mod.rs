//! Adapter logging: per-operation debug hooks and PII redaction.

pub mod debug;
pub mod pii;

pub use debug::{DebugLogger, DebugLogs, Operation, TracingDebugLogger};
pub use pii::{redact, redact_value, Redacted};
