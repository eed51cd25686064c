//! PostgreSQL persistence for the Embermark game world.
//!
//! The store is the only durable component: it holds nodes, actors, items,
//! inventories, statuses, skills, facts, memories, and narrative styles, and
//! enforces referential/uniqueness/check invariants at the storage layer.
//! Turn resolution, combat, narration, and clients are external callers.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use config::DbConfig;
pub use error::{StoreError, StoreResult};

/// Embedded migrations; the schema lives in `db/migrations` at the workspace
/// root so `#[sqlx::test]` and runtime migration share one source.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../db/migrations");

/// Open a connection pool using the given configuration.
pub async fn connect(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        max_connections = config.max_connections,
        "connecting to database"
    );
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await
}

/// Apply any pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Cheap liveness probe.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}
