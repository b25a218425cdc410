//! Repository traits and error handling
//!
//! Provides the CRUD contract shared by the entity repositories and the
//! mapping from SQLx failures onto the domain error taxonomy.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use wf_core::error::{ReferenceProblem, ValidationErrors, WfError};
use wf_core::traits::Entity;

/// Default cap for list queries
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{entity} with {field}={value} already exists")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{entity} with {field}={value} {problem}")]
    Referential {
        entity: &'static str,
        field: &'static str,
        value: String,
        problem: ReferenceProblem,
    },

    #[error("Invalid data: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::DuplicateKey {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn missing(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::Referential {
            entity,
            field,
            value: value.to_string(),
            problem: ReferenceProblem::Missing,
        }
    }

    pub fn still_referenced(
        entity: &'static str,
        field: &'static str,
        value: impl ToString,
        by: &'static str,
    ) -> Self {
        Self::Referential {
            entity,
            field,
            value: value.to_string(),
            problem: ReferenceProblem::StillReferencedBy(by),
        }
    }

    /// Classify a failed insert or update
    ///
    /// Constraint violations the explicit lookups did not catch become
    /// `DuplicateKey` or a missing reference; everything else stays a
    /// database error.
    pub fn on_write(err: sqlx::Error, entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        match constraint_kind(&err) {
            Some(ErrorKind::UniqueViolation) => Self::duplicate(entity, field, value),
            Some(ErrorKind::ForeignKeyViolation) => Self::missing(entity, field, value),
            _ => Self::Database(err),
        }
    }

    /// Classify a failed delete: a foreign key violation means rows in
    /// `by` still point at the target
    pub fn on_delete(
        err: sqlx::Error,
        entity: &'static str,
        field: &'static str,
        value: impl ToString,
        by: &'static str,
    ) -> Self {
        match constraint_kind(&err) {
            Some(ErrorKind::ForeignKeyViolation) => Self::still_referenced(entity, field, value, by),
            _ => Self::Database(err),
        }
    }
}

fn constraint_kind(err: &sqlx::Error) -> Option<ErrorKind> {
    err.as_database_error().map(|db_err| db_err.kind())
}

impl From<RepositoryError> for WfError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, field, value } => WfError::NotFound { entity, field, value },
            RepositoryError::DuplicateKey { entity, field, value } => {
                WfError::DuplicateKey { entity, field, value }
            }
            RepositoryError::Referential {
                entity,
                field,
                value,
                problem,
            } => WfError::Referential {
                entity,
                field,
                value,
                problem,
            },
            RepositoryError::Validation(errors) => WfError::Validation(errors),
            RepositoryError::Database(e) => WfError::Storage(e.to_string()),
            RepositoryError::Migration(e) => WfError::Storage(e.to_string()),
        }
    }
}

/// Base repository trait for CRUD operations
///
/// Lookups return `None` for a missing row; `update` and `delete` report a
/// missing row as `NotFound`.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Find an entity by its key
    async fn find_by_id(&self, key: &T::Key) -> RepositoryResult<Option<T>>;

    /// Find entities, at most `limit` of them
    async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<T>>;

    /// Count all entities
    async fn count(&self) -> RepositoryResult<i64>;

    /// Insert a new entity and return it as stored
    async fn create(&self, entity: &T) -> RepositoryResult<T>;

    /// Replace the stored row with the entity's current values
    async fn update(&self, entity: &T) -> RepositoryResult<T>;

    /// Delete an entity by its key
    async fn delete(&self, key: &T::Key) -> RepositoryResult<()>;

    /// Check if an entity exists
    async fn exists(&self, key: &T::Key) -> RepositoryResult<bool>;
}

/// Non-positive limits fall back to the default cap
pub fn list_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_LIST_LIMIT
    } else {
        limit
    }
}

/// Row count of the entity's table
pub(crate) async fn count_rows<T: Entity>(pool: &SqlitePool) -> RepositoryResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE_NAME);
    let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count_rows_reads_entity_table() {
        use crate::{Database, DepartmentRepository};
        use wf_models::{Department, Project};

        let db = Database::in_memory().await.unwrap();
        DepartmentRepository::new(db.pool().clone())
            .create(&Department::new("Tech", "Alice", None).unwrap())
            .await
            .unwrap();

        assert_eq!(count_rows::<Department>(db.pool()).await.unwrap(), 1);
        assert_eq!(count_rows::<Project>(db.pool()).await.unwrap(), 0);
    }

    #[test]
    fn test_list_limit() {
        assert_eq!(list_limit(0), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(-4), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(25), 25);
        assert_eq!(list_limit(500), 500);
    }

    #[test]
    fn test_into_domain_error() {
        let err: WfError = RepositoryError::duplicate("Department", "name", "Tech").into();
        assert_eq!(err.error_code(), "duplicate_key");

        let err: WfError = RepositoryError::still_referenced("Employee", "id", "1-9", "time_records").into();
        assert!(matches!(
            err,
            WfError::Referential {
                problem: ReferenceProblem::StillReferencedBy("time_records"),
                ..
            }
        ));

        let err: WfError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_non_database_errors_are_not_classified() {
        let err = RepositoryError::on_write(sqlx::Error::RowNotFound, "Project", "name", "Launch");
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
