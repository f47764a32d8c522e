use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub use sqlx; // Re-export for convenience
pub mod error;
pub mod models;
pub mod repositories;

pub use error::RepoError;
pub use repositories::{CatalogStats, SearchCriteria, ToolFilter, ToolRepository};

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the SQLite database behind `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Arc<Self>> {
        if database_url.contains(":memory:") {
            return Self::connect_in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database url: {database_url}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(3)) // Fail fast if the file is locked
            .idle_timeout(Duration::from_secs(60 * 5))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .context("Failed to connect to the database")?;

        Ok(Arc::new(Self { pool }))
    }

    /// A private in-memory database. Every connection to `:memory:` is a
    /// separate database, so the pool is pinned to one connection that never
    /// expires.
    pub async fn connect_in_memory() -> Result<Arc<Self>> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database url")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Ok(Arc::new(Self { pool }))
    }

    /// Applies the embedded schema. Already-applied migrations are skipped.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("src/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }

    pub fn tools(&self) -> ToolRepository {
        ToolRepository::new(self.pool.clone())
    }
}
