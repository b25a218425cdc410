//! Time record repository
//!
//! Database operations for time records.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use wf_core::traits::{Entity, Id};
use wf_models::{Employee, TimeRecord};

use crate::employees::employee_exists;
use crate::repository::{count_rows, list_limit, Repository, RepositoryError, RepositoryResult};

/// Time record database entity
#[derive(Debug, Clone, FromRow)]
pub struct TimeRecordRow {
    pub id: i64,
    pub employee_id: String,
    pub work_date: NaiveDate,
    pub hours: f64,
    pub project: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TimeRecordRow> for TimeRecord {
    type Error = RepositoryError;

    fn try_from(row: TimeRecordRow) -> RepositoryResult<Self> {
        Ok(TimeRecord::new(
            &row.employee_id,
            row.work_date,
            row.hours,
            &row.project,
            row.description.as_deref(),
        )?
        .with_id(row.id)
        .with_created_at(row.created_at))
    }
}

/// Time record repository implementation
pub struct TimeRecordRepository {
    pool: SqlitePool,
}

impl TimeRecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find records of one employee, most recent first
    pub async fn find_by_employee(&self, employee_id: &str) -> RepositoryResult<Vec<TimeRecord>> {
        let rows = sqlx::query_as::<_, TimeRecordRow>(
            r#"
            SELECT id, employee_id, work_date, hours, project, description, created_at
            FROM time_records
            WHERE employee_id = $1
            ORDER BY work_date DESC, id DESC
            "#,
        )
        .bind(employee_id.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TimeRecord::try_from).collect()
    }

    /// Find records logged against a project label, ignoring case, most recent first
    pub async fn find_by_project_label(&self, project: &str) -> RepositoryResult<Vec<TimeRecord>> {
        let rows = sqlx::query_as::<_, TimeRecordRow>(
            r#"
            SELECT id, employee_id, work_date, hours, project, description, created_at
            FROM time_records
            WHERE UPPER(project) = UPPER($1)
            ORDER BY work_date DESC, id DESC
            "#,
        )
        .bind(project.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TimeRecord::try_from).collect()
    }

    /// Sum of all logged hours
    pub async fn total_hours(&self) -> RepositoryResult<f64> {
        let total = sqlx::query_scalar::<_, Option<f64>>("SELECT SUM(hours) FROM time_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.unwrap_or(0.0))
    }
}

#[async_trait]
impl Repository<TimeRecord> for TimeRecordRepository {
    async fn find_by_id(&self, id: &Id) -> RepositoryResult<Option<TimeRecord>> {
        let row = sqlx::query_as::<_, TimeRecordRow>(
            r#"
            SELECT id, employee_id, work_date, hours, project, description, created_at
            FROM time_records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TimeRecord::try_from).transpose()
    }

    async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<TimeRecord>> {
        let rows = sqlx::query_as::<_, TimeRecordRow>(
            r#"
            SELECT id, employee_id, work_date, hours, project, description, created_at
            FROM time_records
            ORDER BY work_date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TimeRecord::try_from).collect()
    }

    async fn count(&self) -> RepositoryResult<i64> {
        count_rows::<TimeRecord>(&self.pool).await
    }

    async fn create(&self, record: &TimeRecord) -> RepositoryResult<TimeRecord> {
        let mut tx = self.pool.begin().await?;

        if !employee_exists(&mut tx, record.employee_id()).await? {
            return Err(RepositoryError::missing(Employee::TYPE_NAME, "id", record.employee_id()));
        }

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO time_records (employee_id, work_date, hours, project, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(record.employee_id())
        .bind(record.work_date())
        .bind(record.hours())
        .bind(record.project())
        .bind(record.description())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Employee::TYPE_NAME, "id", record.employee_id()))?;

        tx.commit().await?;

        tracing::info!(
            id,
            employee_id = record.employee_id(),
            hours = record.hours(),
            "Time record created"
        );
        Ok(record.clone().with_id(id).with_created_at(now))
    }

    /// The employee reference is never rewritten
    async fn update(&self, record: &TimeRecord) -> RepositoryResult<TimeRecord> {
        let id = record
            .id()
            .ok_or_else(|| RepositoryError::not_found(TimeRecord::TYPE_NAME, "id", "<unsaved>"))?;

        let result = sqlx::query(
            r#"
            UPDATE time_records
            SET work_date = $2, hours = $3, project = $4, description = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(record.work_date())
        .bind(record.hours())
        .bind(record.project())
        .bind(record.description())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(TimeRecord::TYPE_NAME, "id", id));
        }

        tracing::info!(id, "Time record updated");
        Ok(record.clone())
    }

    async fn delete(&self, id: &Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM time_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(TimeRecord::TYPE_NAME, "id", id));
        }

        tracing::info!(id, "Time record deleted");
        Ok(())
    }

    async fn exists(&self, id: &Id) -> RepositoryResult<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM time_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}
