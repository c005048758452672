mod common;
mod support;

use adapter_test_support::sqlite::{connect_memory, execute_all};
use auth_sea_adapter::{
    Adapter, AdapterConfig, AdapterError, AuthAdapter, ColumnKind, EntityTarget, Filter,
    SeaOrmSource,
};
use serde_json::json;
use support::{record, sqlite_with_core_tables};

const PLURAL_TABLES: [&str; 2] = [
    r#"CREATE TABLE "users" (
        "id" TEXT PRIMARY KEY,
        "name" TEXT NOT NULL,
        "email" TEXT NOT NULL UNIQUE,
        "emailVerified" BOOLEAN NOT NULL DEFAULT FALSE,
        "image" TEXT,
        "createdAt" TEXT NOT NULL,
        "updatedAt" TEXT NOT NULL
    )"#,
    r#"CREATE TABLE "sessions" (
        "id" TEXT PRIMARY KEY,
        "userId" TEXT NOT NULL,
        "token" TEXT NOT NULL UNIQUE,
        "expiresAt" TEXT NOT NULL,
        "ipAddress" TEXT,
        "userAgent" TEXT,
        "createdAt" TEXT NOT NULL,
        "updatedAt" TEXT NOT NULL
    )"#,
];

const TWO_FACTOR_TABLE: &str = r#"CREATE TABLE "twoFactor" (
    "id" TEXT PRIMARY KEY,
    "secret" TEXT NOT NULL,
    "userId" TEXT NOT NULL
)"#;

/// Test: the default config resolves core models to same-named tables and stamps timestamps
#[tokio::test]
async fn test_default_config_uses_model_named_tables() -> Result<(), AdapterError> {
    let conn = sqlite_with_core_tables().await?;
    let adapter = AuthAdapter::new(SeaOrmSource::new(conn), AdapterConfig::new())?;

    let user = adapter
        .create("user", record(json!({ "email": "d@b.com", "name": "D" })), None)
        .await?;
    assert!(!user["createdAt"].is_null());

    let account = adapter
        .create(
            "account",
            record(json!({
                "userId": user["id"].clone(),
                "accountId": "d@b.com",
                "providerId": "credential",
                "accessTokenExpiresAt": null,
            })),
            None,
        )
        .await?;
    assert!(account["accessTokenExpiresAt"].is_null());

    let renamed = adapter
        .update("user", &Filter::eq("id", user["id"].clone()), record(json!({ "name": "E" })))
        .await?
        .expect("row still matches its id");
    assert_eq!(renamed["name"], "E");
    assert!(!renamed["updatedAt"].is_null());
    Ok(())
}

/// Test: plural mode reads and writes the pluralized tables
#[tokio::test]
async fn test_plural_mode_targets_pluralized_tables() -> Result<(), AdapterError> {
    let conn = connect_memory().await?;
    execute_all(&conn, &PLURAL_TABLES).await?;
    let adapter = AuthAdapter::new(
        SeaOrmSource::new(conn),
        AdapterConfig::new().with_use_plural(true),
    )?;

    let user = adapter
        .create("user", record(json!({ "email": "p@b.com", "name": "P" })), None)
        .await?;
    let user_id = user["id"].as_str().expect("generated id").to_string();
    adapter
        .create(
            "session",
            record(json!({
                "userId": user_id.as_str(),
                "token": "tok-1",
                "expiresAt": "2030-01-01T00:00:00Z",
            })),
            None,
        )
        .await?;

    let found = adapter
        .find_one("user", &Filter::eq("email", "p@b.com"), None)
        .await?
        .expect("user in users table");
    assert_eq!(found["id"], user_id.as_str());

    let touched = adapter
        .update_many(
            "session",
            &Filter::eq("userId", user_id.as_str()),
            record(json!({ "userAgent": "cli" })),
        )
        .await?;
    assert_eq!(touched, 1);
    assert_eq!(adapter.count("session", None).await?, 1);
    Ok(())
}

/// Test: a plugin table without timestamp columns only gets a generated id
#[tokio::test]
async fn test_plugin_model_without_timestamps() -> Result<(), AdapterError> {
    let conn = connect_memory().await?;
    execute_all(&conn, &[TWO_FACTOR_TABLE]).await?;
    let adapter = AuthAdapter::new(
        SeaOrmSource::new(conn),
        AdapterConfig::new().with_model("twoFactor"),
    )?;

    let created = adapter
        .create("twoFactor", record(json!({ "secret": "s1", "userId": "u1" })), None)
        .await?;
    assert!(created["id"].is_string());
    assert!(!created.contains_key("createdAt"));
    assert!(!created.contains_key("updatedAt"));

    let touched = adapter
        .update_many("twoFactor", &Filter::eq("userId", "u1"), record(json!({ "secret": "s2" })))
        .await?;
    assert_eq!(touched, 1);

    let updated = adapter
        .update(
            "twoFactor",
            &Filter::eq("id", created["id"].clone()),
            record(json!({ "secret": "s3" })),
        )
        .await?
        .expect("row still matches its id");
    assert_eq!(updated["secret"], "s3");
    assert!(!updated.contains_key("updatedAt"));
    Ok(())
}

/// Test: a plugin table with declared timestamp columns gets them stamped
#[tokio::test]
async fn test_plugin_model_with_declared_columns() -> Result<(), AdapterError> {
    let conn = connect_memory().await?;
    execute_all(
        &conn,
        &[r#"CREATE TABLE "passkey" (
            "id" TEXT PRIMARY KEY,
            "name" TEXT,
            "createdAt" TEXT NOT NULL
        )"#],
    )
    .await?;
    let passkeys = EntityTarget::table("passkey").with_columns([
        ("id", ColumnKind::Text),
        ("name", ColumnKind::Text),
        ("createdAt", ColumnKind::Timestamp),
    ]);
    let adapter = AuthAdapter::new(
        SeaOrmSource::new(conn),
        AdapterConfig::new()
            .with_model("passkey")
            .with_entity("passkey", passkeys),
    )?;

    let created = adapter
        .create("passkey", record(json!({ "name": "laptop" })), None)
        .await?;
    assert!(!created["createdAt"].is_null());
    assert!(!created.contains_key("updatedAt"));

    let touched = adapter
        .update_many("passkey", &Filter::eq("name", "laptop"), record(json!({ "name": "phone" })))
        .await?;
    assert_eq!(touched, 1);
    Ok(())
}
