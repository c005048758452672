#![allow(dead_code)]

//! Shared fixtures for the adapter integration tests.

use auth_sea_adapter::entities::{Accounts, Sessions, Users, Verifications};
use auth_sea_adapter::{
    AdapterConfig, AuthAdapter, EntityTarget, MemorySource, Record, SeaOrmSource,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use serde_json::Value;

pub fn record(value: Value) -> Record {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}

pub fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

async fn create_table<E: EntityTrait>(
    conn: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let stmt = schema.create_table_from_entity(entity);
    conn.execute(conn.get_database_backend().build(&stmt)).await?;
    Ok(())
}

/// In-memory SQLite database with the four core tables created from the
/// shipped entities.
pub async fn sqlite_with_core_tables() -> Result<DatabaseConnection, DbErr> {
    let conn = adapter_test_support::sqlite::connect_memory().await?;
    let schema = Schema::new(conn.get_database_backend());
    create_table(&conn, &schema, Users).await?;
    create_table(&conn, &schema, Sessions).await?;
    create_table(&conn, &schema, Accounts).await?;
    create_table(&conn, &schema, Verifications).await?;
    Ok(conn)
}

/// Config whose core models resolve to the shipped entities, column sets included.
pub fn entity_config() -> AdapterConfig {
    AdapterConfig::new()
        .with_entity("user", EntityTarget::from_entity::<Users>())
        .with_entity("session", EntityTarget::from_entity::<Sessions>())
        .with_entity("account", EntityTarget::from_entity::<Accounts>())
        .with_entity("verification", EntityTarget::from_entity::<Verifications>())
}

pub async fn sqlite_adapter() -> AuthAdapter<SeaOrmSource> {
    let conn = sqlite_with_core_tables()
        .await
        .expect("create in-memory sqlite schema");
    AuthAdapter::new(SeaOrmSource::new(conn), entity_config()).expect("valid adapter config")
}

pub fn memory_adapter() -> AuthAdapter<MemorySource> {
    AuthAdapter::new(MemorySource::new(), AdapterConfig::new()).expect("valid adapter config")
}
