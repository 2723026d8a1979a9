//! Persistence layer for the bridgelane platform.
//!
//! `models` holds row structs and DTOs, `repositories` holds zero-sized
//! structs with async CRUD methods that accept `&PgPool` as their first
//! argument. Repositories return `Result<_, sqlx::Error>`; domain rules
//! live in `bridgelane-core` and are applied at the API boundary before
//! the repository is called.

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

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
