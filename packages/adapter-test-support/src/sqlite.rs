//! In-memory SQLite connections for adapter tests.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Open a fresh in-memory SQLite database.
///
/// The pool is pinned to a single connection: every pooled connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn connect_memory() -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let conn = Database::connect(opts).await?;
    tracing::debug!("opened in-memory sqlite database");
    Ok(conn)
}

/// Execute raw SQL statements in order, stopping at the first failure.
pub async fn execute_all(conn: &DatabaseConnection, statements: &[&str]) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    for sql in statements {
        conn.execute(Statement::from_string(backend, (*sql).to_string()))
            .await?;
    }
    Ok(())
}
