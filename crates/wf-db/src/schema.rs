//! Schema bootstrap
//!
//! The schema lives in `migrations/` and is embedded at compile time.
//! Every statement is idempotent, so running it against an existing
//! database leaves the data untouched.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

use crate::repository::RepositoryResult;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations
pub async fn migrate(pool: &SqlitePool) -> RepositoryResult<()> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
