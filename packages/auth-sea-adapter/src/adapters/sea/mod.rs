//! SeaORM-backed repositories.
//!
//! Statements are built with sea-query against the resolved table name and
//! executed on the caller's `DatabaseConnection`. Rows come back as JSON
//! objects via `JsonValue::find_by_statement`.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, JsonValue, Statement,
    StatementBuilder,
};
use tracing::debug;

use crate::filter::WhereMap;
use crate::logging::Redacted;
use crate::query::SelectQuery;
use crate::registry::EntityTarget;
use crate::repos::{
    project, stamp_insert, stamp_update, Affected, Record, Repository, RepositorySource, ID_COLUMN,
};

pub mod statements;

/// Hands out repositories sharing one connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmSource {
    conn: DatabaseConnection,
}

impl SeaOrmSource {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

impl RepositorySource for SeaOrmSource {
    type Repo = SeaRepository;

    fn repository(&self, target: &EntityTarget) -> SeaRepository {
        SeaRepository {
            conn: self.conn.clone(),
            target: target.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeaRepository {
    conn: DatabaseConnection,
    target: EntityTarget,
}

impl SeaRepository {
    fn table(&self) -> &str {
        self.target.table_name()
    }

    fn build<S: StatementBuilder>(&self, stmt: &S) -> Statement {
        let statement = self.conn.get_database_backend().build(stmt);
        // Statement display inlines bound values.
        debug!(table = self.table(), sql = %Redacted(&statement.to_string()), "sea statement");
        statement
    }
}

fn into_record(row: JsonValue) -> Result<Record, DbErr> {
    match row {
        JsonValue::Object(map) => Ok(map),
        other => Err(DbErr::Type(format!("expected a row object, got {other}"))),
    }
}

#[async_trait]
impl Repository for SeaRepository {
    async fn insert(&self, mut data: Record) -> Result<Record, DbErr> {
        stamp_insert(&self.target, &mut data)?;
        let backend = self.conn.get_database_backend();
        let stmt = statements::insert(backend, &self.target, &data)?;
        self.conn.execute(self.build(&stmt)).await?;

        // Read back so defaults the database fills in are visible.
        let Some(id) = data.get(ID_COLUMN).filter(|id| !id.is_null()).cloned() else {
            return Ok(data);
        };
        let mut by_id = WhereMap::new();
        by_id.insert(ID_COLUMN, id);
        let stored = self.find_one(&SelectQuery::new().filter(&by_id)).await?;
        Ok(stored.unwrap_or(data))
    }

    async fn find_one(&self, query: &SelectQuery) -> Result<Option<Record>, DbErr> {
        let backend = self.conn.get_database_backend();
        let query = query.clone().limit(1);
        let stmt = statements::select(backend, &self.target, &query);
        JsonValue::find_by_statement(self.build(&stmt))
            .one(&self.conn)
            .await?
            .map(into_record)
            .transpose()
    }

    async fn find_many(&self, query: &SelectQuery) -> Result<Vec<Record>, DbErr> {
        let backend = self.conn.get_database_backend();
        let stmt = statements::select(backend, &self.target, query);
        JsonValue::find_by_statement(self.build(&stmt))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|row| into_record(row).map(|r| project(r, query.selected())))
            .collect()
    }

    async fn update(&self, criteria: &WhereMap, changes: &Record) -> Result<Affected, DbErr> {
        let backend = self.conn.get_database_backend();
        let changes = stamp_update(&self.target, changes)?;
        let stmt = statements::update(backend, &self.target, criteria, &changes)?;
        let result = self.conn.execute(self.build(&stmt)).await?;
        Ok(Affected::rows(result.rows_affected()))
    }

    async fn delete(&self, criteria: &WhereMap) -> Result<Affected, DbErr> {
        let backend = self.conn.get_database_backend();
        let stmt = statements::delete(backend, &self.target, criteria);
        let result = self.conn.execute(self.build(&stmt)).await?;
        Ok(Affected::rows(result.rows_affected()))
    }

    async fn count(&self, criteria: &WhereMap) -> Result<u64, DbErr> {
        let backend = self.conn.get_database_backend();
        let stmt = statements::count(backend, &self.target, criteria);
        let Some(row) = self.conn.query_one(self.build(&stmt)).await? else {
            return Ok(0);
        };
        let total: i64 = row.try_get("", statements::COUNT_COLUMN)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
