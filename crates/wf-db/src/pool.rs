//! Database connection pool management
//!
//! Provides SQLite connection pooling using SQLx.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use wf_core::config::DatabaseConfig;

use crate::repository::RepositoryResult;
use crate::schema;

/// URL of a private in-memory database
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// Foreign keys are enforced on every connection. An in-memory database
    /// lives only as long as its connection, so it is served by exactly one
    /// connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let in_memory = is_in_memory(&config.url);
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;

        tracing::info!(
            url = %config.url,
            in_memory,
            "Database pool created with {} max connections",
            if in_memory { 1 } else { config.max_connections.max(1) }
        );

        Ok(Self { pool })
    }

    /// Fresh in-memory database with the schema applied
    pub async fn in_memory() -> RepositoryResult<Self> {
        let db = Self::connect(&DatabaseConfig {
            url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
        })
        .await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create any missing tables
    pub async fn migrate(&self) -> RepositoryResult<()> {
        schema::migrate(&self.pool).await
    }

    /// Check if the database is reachable
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://workforce.db"));
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::in_memory().await.unwrap();
        db.ping().await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('departments', 'employees', 'projects', 'time_records', 'employee_project', 'users')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, 6);

        db.close().await;
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("workforce.db").display());
        let db = Database::connect(&DatabaseConfig { url, max_connections: 2 }).await.unwrap();
        db.migrate().await.unwrap();
        // second run is a no-op
        db.migrate().await.unwrap();
        assert!(dir.path().join("workforce.db").exists());
    }
}
