//! In-memory repository backend.
//!
//! Rows live in a `HashMap<table, Vec<Record>>` behind a `tokio::sync::RwLock`.
//! It follows the same equality/sort/limit semantics as the SeaORM backend and
//! is meant for tests and local development; data is lost on drop.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DbErr;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::filter::WhereMap;
use crate::query::{SelectQuery, SortDirection};
use crate::registry::EntityTarget;
use crate::repos::{
    project, stamp_insert, stamp_update, Affected, Record, Repository, RepositorySource, ID_COLUMN,
};

type Store = HashMap<String, Vec<Record>>;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    store: Arc<RwLock<Store>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `table` with rows, as-is (no generated columns are added).
    pub async fn seed(&self, table: &str, rows: impl IntoIterator<Item = Record>) {
        self.store
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Copy of the rows currently stored in `table`.
    pub async fn rows(&self, table: &str) -> Vec<Record> {
        self.store
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

impl RepositorySource for MemorySource {
    type Repo = MemoryRepository;

    fn repository(&self, target: &EntityTarget) -> MemoryRepository {
        MemoryRepository {
            store: Arc::clone(&self.store),
            target: target.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryRepository {
    store: Arc<RwLock<Store>>,
    target: EntityTarget,
}

impl MemoryRepository {
    fn table(&self) -> &str {
        self.target.table_name()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert(&self, mut data: Record) -> Result<Record, DbErr> {
        stamp_insert(&self.target, &mut data)?;

        let mut store = self.store.write().await;
        let rows = store.entry(self.table().to_string()).or_default();
        if let Some(id) = data.get(ID_COLUMN).filter(|id| !id.is_null()) {
            if rows.iter().any(|row| row.get(ID_COLUMN) == Some(id)) {
                return Err(DbErr::Custom(format!(
                    "UNIQUE constraint failed: {}.{ID_COLUMN}",
                    self.table()
                )));
            }
        }
        rows.push(data.clone());
        debug!(table = self.table(), "memory insert");
        Ok(data)
    }

    async fn find_one(&self, query: &SelectQuery) -> Result<Option<Record>, DbErr> {
        let query = query.clone().limit(1);
        Ok(self.find_many(&query).await?.into_iter().next())
    }

    async fn find_many(&self, query: &SelectQuery) -> Result<Vec<Record>, DbErr> {
        let criteria = query.criteria();
        let store = self.store.read().await;
        let mut rows: Vec<Record> = store
            .get(self.table())
            .map(|rows| {
                rows.iter()
                    .filter(|row| criteria.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(store);

        if let Some(sort) = query.sort() {
            rows.sort_by(|a, b| {
                let ord = compare_json(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let offset = query.row_offset().unwrap_or(0) as usize;
        let limit = query.row_limit().map_or(usize::MAX, |l| l as usize);
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, query.selected()))
            .collect())
    }

    async fn update(&self, criteria: &WhereMap, changes: &Record) -> Result<Affected, DbErr> {
        if changes.is_empty() {
            return Err(DbErr::Custom("update requires at least one value".into()));
        }
        let changes = stamp_update(&self.target, changes)?;

        let mut store = self.store.write().await;
        let mut affected = 0;
        if let Some(rows) = store.get_mut(self.table()) {
            for row in rows.iter_mut().filter(|row| criteria.matches(row)) {
                for (k, v) in &changes {
                    row.insert(k.clone(), v.clone());
                }
                affected += 1;
            }
        }
        Ok(Affected::rows(affected))
    }

    async fn delete(&self, criteria: &WhereMap) -> Result<Affected, DbErr> {
        let mut store = self.store.write().await;
        let Some(rows) = store.get_mut(self.table()) else {
            return Ok(Affected::rows(0));
        };
        let before = rows.len();
        rows.retain(|row| !criteria.matches(row));
        Ok(Affected::rows((before - rows.len()) as u64))
    }

    async fn count(&self, criteria: &WhereMap) -> Result<u64, DbErr> {
        let store = self.store.read().await;
        Ok(store
            .get(self.table())
            .map_or(0, |rows| rows.iter().filter(|row| criteria.matches(row)).count()) as u64)
    }
}

/// Order two optional JSON values; missing/null sort first, mismatched types compare equal.
fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
