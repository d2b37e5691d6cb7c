//! Database layer: connection pool, migrations, row models and repositories.

use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Schema and seed state reported by the health endpoint.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SchemaStatus {
    /// Version of the newest successfully applied migration.
    pub schema_version: Option<i64>,
    /// Rows in the global permission catalogue.
    pub permission_count: i64,
}

/// Read the applied migration version and the permission catalogue size.
pub async fn schema_status(pool: &DbPool) -> Result<SchemaStatus, sqlx::Error> {
    sqlx::query_as::<_, SchemaStatus>(
        "SELECT
            (SELECT MAX(version) FROM _sqlx_migrations WHERE success) AS schema_version,
            (SELECT COUNT(*) FROM permissions) AS permission_count",
    )
    .fetch_one(pool)
    .await
}

/// Apply all pending migrations embedded from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await?;
    tracing::debug!("Database migrations up to date");
    Ok(())
}
