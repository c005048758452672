//! The data-access contract the authentication framework calls, and its
//! implementation over a [`RepositorySource`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::AdapterConfig;
use crate::errors::{AdapterError, AdapterResult};
use crate::filter::{normalize, Filter};
use crate::logging::Operation;
use crate::query::{FindManyQuery, SelectQuery};
use crate::registry::ModelRegistry;
use crate::repos::{project, Record, Repository, RepositorySource};
use crate::schema::{write_entities, AuthSchema, DEFAULT_OUTPUT_DIR};

pub const ADAPTER_ID: &str = "sea-orm-adapter";
pub const ADAPTER_NAME: &str = "SeaORM Adapter";

#[async_trait]
pub trait Adapter: Send + Sync {
    /// Insert `data` and return the stored record, projected onto `select` when given.
    async fn create(
        &self,
        model: &str,
        data: Record,
        select: Option<&[String]>,
    ) -> AdapterResult<Record>;

    /// Update every row matching `filter`; returns one matching row afterwards.
    ///
    /// Fails with `NotFound` when nothing matches. Not atomic: a concurrent
    /// writer can change the rows between the check, the write and the re-read.
    async fn update(
        &self,
        model: &str,
        filter: &Filter,
        update: Record,
    ) -> AdapterResult<Option<Record>>;

    async fn update_many(&self, model: &str, filter: &Filter, update: Record)
        -> AdapterResult<u64>;

    async fn delete(&self, model: &str, filter: &Filter) -> AdapterResult<()>;

    async fn delete_many(&self, model: &str, filter: &Filter) -> AdapterResult<u64>;

    async fn find_one(
        &self,
        model: &str,
        filter: &Filter,
        select: Option<&[String]>,
    ) -> AdapterResult<Option<Record>>;

    async fn find_many(&self, model: &str, query: FindManyQuery) -> AdapterResult<Vec<Record>>;

    async fn count(&self, model: &str, filter: Option<&Filter>) -> AdapterResult<u64>;
}

/// Static description of what this adapter supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub adapter_id: &'static str,
    pub adapter_name: &'static str,
    pub use_plural: bool,
    #[serde(rename = "supportsJSON")]
    pub supports_json: bool,
    pub supports_dates: bool,
    pub supports_booleans: bool,
    pub supports_numeric_ids: bool,
    pub transaction: bool,
}

pub struct AuthAdapter<S: RepositorySource> {
    source: S,
    config: AdapterConfig,
    registry: ModelRegistry,
}

impl<S: RepositorySource> std::fmt::Debug for AuthAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthAdapter")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<S: RepositorySource> AuthAdapter<S> {
    /// Resolve every configured model up front; bad overrides fail here.
    pub fn new(source: S, config: AdapterConfig) -> AdapterResult<Self> {
        let registry = ModelRegistry::from_config(&config)?;
        Ok(Self {
            source,
            config,
            registry,
        })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            adapter_id: ADAPTER_ID,
            adapter_name: ADAPTER_NAME,
            use_plural: self.config.use_plural,
            supports_json: true,
            supports_dates: true,
            supports_booleans: true,
            supports_numeric_ids: false,
            transaction: false,
        }
    }

    /// Emit SeaORM entity modules for `schema` into `dir` (default `./src/entities`).
    pub async fn create_schema(
        &self,
        schema: &AuthSchema,
        dir: Option<&Path>,
    ) -> AdapterResult<Vec<PathBuf>> {
        let dir = dir.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR));
        let mut stdout = std::io::stdout();
        write_entities(dir, schema, &mut stdout).await
    }

    fn repository(&self, model: &str) -> AdapterResult<S::Repo> {
        let target = self.registry.resolve(model)?;
        Ok(self.source.repository(target))
    }

    fn trace(&self, operation: Operation, args: impl FnOnce() -> Value) {
        if self.config.debug_logs.enabled_for(operation) {
            self.config.debug_logger.log(operation, &args());
        }
    }
}

fn filter_json(filter: Option<&Filter>) -> Value {
    filter.map_or(Value::Null, |f| json!(f))
}

#[async_trait]
impl<S: RepositorySource> Adapter for AuthAdapter<S> {
    async fn create(
        &self,
        model: &str,
        data: Record,
        select: Option<&[String]>,
    ) -> AdapterResult<Record> {
        self.trace(Operation::Create, || {
            json!({ "model": model, "data": data, "select": select })
        });
        let repo = self.repository(model)?;
        let created = repo.insert(data).await?;
        Ok(project(created, select.unwrap_or_default()))
    }

    async fn update(
        &self,
        model: &str,
        filter: &Filter,
        update: Record,
    ) -> AdapterResult<Option<Record>> {
        self.trace(Operation::Update, || {
            json!({ "model": model, "where": filter, "update": update })
        });
        let repo = self.repository(model)?;
        let criteria = filter.normalize();
        let lookup = SelectQuery::new().filter(&criteria);

        if repo.find_one(&lookup).await?.is_none() {
            return Err(AdapterError::not_found(model));
        }
        repo.update(&criteria, &update).await?;
        Ok(repo.find_one(&lookup).await?)
    }

    async fn update_many(
        &self,
        model: &str,
        filter: &Filter,
        update: Record,
    ) -> AdapterResult<u64> {
        self.trace(Operation::UpdateMany, || {
            json!({ "model": model, "where": filter, "update": update })
        });
        let repo = self.repository(model)?;
        let affected = repo.update(&filter.normalize(), &update).await?;
        Ok(affected.or_zero())
    }

    async fn delete(&self, model: &str, filter: &Filter) -> AdapterResult<()> {
        self.trace(Operation::Delete, || json!({ "model": model, "where": filter }));
        let repo = self.repository(model)?;
        repo.delete(&filter.normalize()).await?;
        Ok(())
    }

    async fn delete_many(&self, model: &str, filter: &Filter) -> AdapterResult<u64> {
        self.trace(Operation::DeleteMany, || {
            json!({ "model": model, "where": filter })
        });
        let repo = self.repository(model)?;
        let affected = repo.delete(&filter.normalize()).await?;
        Ok(affected.or_zero())
    }

    async fn find_one(
        &self,
        model: &str,
        filter: &Filter,
        select: Option<&[String]>,
    ) -> AdapterResult<Option<Record>> {
        self.trace(Operation::FindOne, || {
            json!({ "model": model, "where": filter, "select": select })
        });
        let repo = self.repository(model)?;
        let query = SelectQuery::new()
            .filter(&filter.normalize())
            .select(select.unwrap_or_default());
        debug!(model, query = %query.describe(), "findOne");
        Ok(repo.find_one(&query).await?)
    }

    async fn find_many(&self, model: &str, query: FindManyQuery) -> AdapterResult<Vec<Record>> {
        self.trace(Operation::FindMany, || {
            let mut args = json!(query);
            args["model"] = json!(model);
            args
        });
        let repo = self.repository(model)?;
        let mut select = SelectQuery::new()
            .filter(&normalize(query.filter.as_ref()))
            .select(query.select.as_deref().unwrap_or_default())
            .limit(query.limit.unwrap_or(0))
            .offset(query.offset.unwrap_or(0));
        if let Some(sort) = query.sort_by {
            select = select.order_by(sort);
        }
        debug!(model, query = %select.describe(), "findMany");
        Ok(repo.find_many(&select).await?)
    }

    async fn count(&self, model: &str, filter: Option<&Filter>) -> AdapterResult<u64> {
        self.trace(Operation::Count, || {
            json!({ "model": model, "where": filter_json(filter) })
        });
        let repo = self.repository(model)?;
        Ok(repo.count(&normalize(filter)).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::adapters::MemorySource;
    use crate::filter::Condition;
    use crate::logging::{DebugLogger, DebugLogs};

    #[derive(Debug, Default)]
    struct Capture(Mutex<Vec<(Operation, Value)>>);

    impl DebugLogger for Capture {
        fn log(&self, operation: Operation, args: &Value) {
            self.0.lock().unwrap().push((operation, args.clone()));
        }
    }

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn debug_logger_sees_enabled_operations_only() {
        let capture = Arc::new(Capture::default());
        let config = AdapterConfig::new()
            .with_debug_logs(DebugLogs::only([Operation::Create, Operation::Count]))
            .with_debug_logger(capture.clone());
        let adapter = AuthAdapter::new(MemorySource::new(), config).unwrap();

        adapter
            .create("user", record(json!({ "email": "a@b.com" })), None)
            .await
            .unwrap();
        adapter
            .find_one("user", &Filter::eq("email", "a@b.com"), None)
            .await
            .unwrap();
        adapter.count("user", None).await.unwrap();

        let calls = capture.0.lock().unwrap();
        let ops: Vec<_> = calls.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, [Operation::Create, Operation::Count]);
        assert_eq!(calls[0].1["model"], "user");
        assert_eq!(calls[0].1["data"]["email"], "a@b.com");
    }

    #[tokio::test]
    async fn update_reports_not_found_without_writing() {
        let source = MemorySource::new();
        let adapter = AuthAdapter::new(source.clone(), AdapterConfig::new()).unwrap();

        let err = adapter
            .update(
                "session",
                &Filter::Conditions(vec![Condition::eq("token", "missing")]),
                record(json!({ "token": "new" })),
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Record not found in session");
        assert!(source.rows("session").await.is_empty());
    }

    #[tokio::test]
    async fn unknown_models_are_rejected() {
        let adapter = AuthAdapter::new(MemorySource::new(), AdapterConfig::new()).unwrap();
        let err = adapter.count("passkey", None).await.unwrap_err();
        assert!(matches!(err, AdapterError::UnknownModel { .. }));
    }

    #[test]
    fn capabilities_describe_the_adapter() {
        let adapter = AuthAdapter::new(
            MemorySource::new(),
            AdapterConfig::new().with_use_plural(true),
        )
        .unwrap();
        let caps = serde_json::to_value(adapter.capabilities()).unwrap();
        assert_eq!(caps["adapterId"], "sea-orm-adapter");
        assert_eq!(caps["usePlural"], true);
        assert_eq!(caps["supportsJSON"], true);
        assert_eq!(caps["supportsNumericIds"], false);
        assert_eq!(caps["transaction"], false);
    }
}
