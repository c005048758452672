//! Repository capability consumed by the adapter.
//!
//! A [`RepositorySource`] hands out one [`Repository`] per resolved
//! [`EntityTarget`]. Repositories report store failures as `sea_orm::DbErr`;
//! the adapter layer maps them into `AdapterError` via `From<DbErr>`.

use async_trait::async_trait;
use sea_orm::DbErr;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;

use crate::filter::WhereMap;
use crate::query::SelectQuery;
use crate::registry::EntityTarget;

/// One row, as a JSON object keyed by column name.
pub type Record = serde_json::Map<String, Value>;

pub const ID_COLUMN: &str = "id";
pub const CREATED_AT_COLUMN: &str = "createdAt";
pub const UPDATED_AT_COLUMN: &str = "updatedAt";

/// Rows touched by an update or delete. `None` when the store does not report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affected(pub Option<u64>);

impl Affected {
    pub fn rows(n: u64) -> Self {
        Self(Some(n))
    }

    pub fn unreported() -> Self {
        Self(None)
    }

    /// Affected count with an unreported count read as zero.
    pub fn or_zero(self) -> u64 {
        self.0.unwrap_or(0)
    }
}

#[async_trait]
pub trait Repository: Send + Sync {
    /// Persist a new row and return it as stored.
    async fn insert(&self, data: Record) -> Result<Record, DbErr>;

    async fn find_one(&self, query: &SelectQuery) -> Result<Option<Record>, DbErr>;

    async fn find_many(&self, query: &SelectQuery) -> Result<Vec<Record>, DbErr>;

    /// Apply `changes` to every row matching `criteria`.
    async fn update(&self, criteria: &WhereMap, changes: &Record) -> Result<Affected, DbErr>;

    async fn delete(&self, criteria: &WhereMap) -> Result<Affected, DbErr>;

    async fn count(&self, criteria: &WhereMap) -> Result<u64, DbErr>;
}

pub trait RepositorySource: Send + Sync {
    type Repo: Repository;

    fn repository(&self, target: &EntityTarget) -> Self::Repo;
}

/// Current UTC time as RFC 3339, the representation generated date columns use.
pub fn now_rfc3339() -> Result<String, DbErr> {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| DbErr::Custom(format!("failed to format timestamp: {e}")))
}

/// Fill the generated columns a new row of `target` needs and the caller left out.
pub fn stamp_insert(target: &EntityTarget, data: &mut Record) -> Result<(), DbErr> {
    if target.owns_column(ID_COLUMN) && is_missing(data, ID_COLUMN) {
        data.insert(
            ID_COLUMN.to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
    }

    let now = now_rfc3339()?;
    for column in [CREATED_AT_COLUMN, UPDATED_AT_COLUMN] {
        if target.owns_column(column) && is_missing(data, column) {
            data.insert(column.to_string(), Value::String(now.clone()));
        }
    }
    Ok(())
}

/// Bump `updatedAt` on an update unless the caller sets it.
pub fn stamp_update(target: &EntityTarget, changes: &Record) -> Result<Record, DbErr> {
    let mut changes = changes.clone();
    if !changes.is_empty()
        && target.owns_column(UPDATED_AT_COLUMN)
        && !changes.contains_key(UPDATED_AT_COLUMN)
    {
        changes.insert(UPDATED_AT_COLUMN.to_string(), Value::String(now_rfc3339()?));
    }
    Ok(changes)
}

/// Keep only `fields` of `record`; an empty list keeps everything.
pub fn project(record: Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record;
    }
    record
        .into_iter()
        .filter(|(k, _)| fields.iter().any(|f| f == k))
        .collect()
}

fn is_missing(data: &Record, column: &str) -> bool {
    data.get(column).map_or(true, Value::is_null)
}
