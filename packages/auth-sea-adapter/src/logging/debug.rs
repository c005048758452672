//! Per-operation debug logging.
//!
//! Every adapter operation reports its name and arguments to a
//! [`DebugLogger`] before it touches the store, provided [`DebugLogs`] enables
//! that operation. The default logger emits one `tracing` event per call with
//! the arguments redacted.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::info;

use crate::logging::pii::redact_value;

/// The inbound operations of the adapter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Create,
    Update,
    UpdateMany,
    Delete,
    DeleteMany,
    FindOne,
    FindMany,
    Count,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Update,
        Operation::UpdateMany,
        Operation::Delete,
        Operation::DeleteMany,
        Operation::FindOne,
        Operation::FindMany,
        Operation::Count,
    ];

    /// Name as the authentication framework spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::UpdateMany => "updateMany",
            Operation::Delete => "delete",
            Operation::DeleteMany => "deleteMany",
            Operation::FindOne => "findOne",
            Operation::FindMany => "findMany",
            Operation::Count => "count",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown adapter operation '{s}'"))
    }
}

/// Which operations get reported to the debug logger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DebugLogs {
    #[default]
    Disabled,
    All,
    Only(BTreeSet<Operation>),
}

impl DebugLogs {
    pub fn enabled_for(&self, operation: Operation) -> bool {
        match self {
            DebugLogs::Disabled => false,
            DebugLogs::All => true,
            DebugLogs::Only(ops) => ops.contains(&operation),
        }
    }

    pub fn only(ops: impl IntoIterator<Item = Operation>) -> Self {
        DebugLogs::Only(ops.into_iter().collect())
    }
}

impl From<bool> for DebugLogs {
    fn from(enabled: bool) -> Self {
        if enabled {
            DebugLogs::All
        } else {
            DebugLogs::Disabled
        }
    }
}

impl FromStr for DebugLogs {
    type Err = String;

    /// Accepts `true`/`false`/`1`/`0`/`all` or a comma-separated operation list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "off" => return Ok(DebugLogs::Disabled),
            "1" | "true" | "on" | "all" => return Ok(DebugLogs::All),
            _ => {}
        }

        let ops = trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Operation::from_str)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(DebugLogs::Only(ops))
    }
}

/// Receives the operation name and its structured arguments before execution.
pub trait DebugLogger: Send + Sync + fmt::Debug {
    fn log(&self, operation: Operation, args: &Value);
}

/// Default logger: one `info` event per call, arguments redacted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDebugLogger;

impl DebugLogger for TracingDebugLogger {
    fn log(&self, operation: Operation, args: &Value) {
        let model = args.get("model").and_then(Value::as_str).unwrap_or_default();
        info!(
            target: "auth_sea_adapter::debug",
            operation = %operation,
            model,
            args = %redact_value(args),
            "adapter call"
        );
    }
}
