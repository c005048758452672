#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod entities;
pub mod errors;
pub mod filter;
pub mod logging;
pub mod query;
pub mod registry;
pub mod repos;
pub mod schema;

// Re-exports for public API
pub use adapter::{Adapter, AuthAdapter, Capabilities};
pub use adapters::{MemorySource, SeaOrmSource};
pub use config::AdapterConfig;
pub use errors::{AdapterError, AdapterResult};
pub use filter::{Condition, Connector, FieldPair, Filter, Operator, WhereMap};
pub use logging::{DebugLogger, DebugLogs, Operation, TracingDebugLogger};
pub use query::{FindManyQuery, SelectQuery, SortBy, SortDirection};
pub use registry::{ColumnKind, EntityTarget, ModelRegistry};
pub use repos::{Record, Repository, RepositorySource};
pub use schema::{AuthSchema, FieldSchema, FieldType, TableSchema};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    adapter_test_support::logging::init();
}
