//! Persistence layer for Bugboard.
//!
//! - [`Store`] -- the repository trait consumed by the services.
//! - [`PgStore`] -- PostgreSQL implementation on `sqlx`.
//! - [`MemoryStore`] -- in-process implementation for tests and local runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod store;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{Store, StoreResult};

/// Alias for the connection pool type used throughout the application.
pub type DbPool = PgPool;

/// Maximum number of pooled connections.
const MAX_CONNECTIONS: u32 = 10;

/// Open a connection pool against `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Run `SELECT 1` to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
