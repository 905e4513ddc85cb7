//! Persistence gateway: connection pool, schema migrations, entity models
//! and per-table repositories.
//!
//! Every invariant on the stored data (unique email, foreign keys with their
//! cascade / set-null policies, the comment target check) is declared in the
//! migrations under `db/migrations` and enforced by PostgreSQL itself.

use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Ordered, reversible schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../db/migrations");

/// Connection pool tuning.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations in version order.
///
/// Already-applied migrations are skipped, so calling this against an
/// up-to-date database is a no-op.
pub async fn run_migrations(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::debug!(count = migration_count(), "Migrations up to date");
    Ok(())
}

/// Number of embedded migrations, counting each reversible pair once.
pub fn migration_count() -> usize {
    MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .count()
}

/// Revert every applied migration whose version is newer than `target`.
///
/// Pass `0` to roll the schema back completely.
pub async fn revert_migrations(pool: &DbPool, target: i64) -> Result<(), MigrateError> {
    MIGRATOR.undo(pool, target).await?;
    tracing::info!(target, "Migrations reverted");
    Ok(())
}
