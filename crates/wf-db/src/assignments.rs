//! Assignment repository
//!
//! Employee-project membership (table `employee_project`).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use wf_core::traits::{Entity, Id};
use wf_models::{Assignment, Employee, Project};

use crate::employees::{employee_exists, EmployeeRow};
use crate::projects::{project_exists, ProjectRow};
use crate::repository::{count_rows, list_limit, RepositoryError, RepositoryResult};

/// Assignment database entity
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentRow {
    pub id: i64,
    pub employee_id: String,
    pub project_id: i64,
    pub assigned_at: DateTime<Utc>,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = RepositoryError;

    fn try_from(row: AssignmentRow) -> RepositoryResult<Self> {
        Ok(Assignment::new(&row.employee_id, row.project_id)?
            .with_id(row.id)
            .with_assigned_at(row.assigned_at))
    }
}

/// Assignment repository implementation
pub struct AssignmentRepository {
    pool: SqlitePool,
}

async fn verify_references(conn: &mut SqliteConnection, employee_id: &str, project_id: Id) -> RepositoryResult<()> {
    if !employee_exists(&mut *conn, employee_id).await? {
        return Err(RepositoryError::missing(Employee::TYPE_NAME, "id", employee_id));
    }
    if !project_exists(&mut *conn, project_id).await? {
        return Err(RepositoryError::missing(Project::TYPE_NAME, "id", project_id));
    }
    Ok(())
}

async fn pair_exists(conn: &mut SqliteConnection, employee_id: &str, project_id: Id) -> RepositoryResult<bool> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM employee_project WHERE employee_id = $1 AND project_id = $2",
    )
    .bind(employee_id)
    .bind(project_id)
    .fetch_optional(conn)
    .await?;
    Ok(found.is_some())
}

impl AssignmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Assign an employee to a project
    ///
    /// Both sides must exist and the pair must be new.
    pub async fn assign(&self, employee_id: &str, project_id: Id) -> RepositoryResult<Assignment> {
        let assignment = Assignment::new(employee_id, project_id)?;
        let employee_id = assignment.employee_id();

        let mut tx = self.pool.begin().await?;

        verify_references(&mut tx, employee_id, project_id).await?;
        if pair_exists(&mut tx, employee_id, project_id).await? {
            return Err(RepositoryError::duplicate(
                Assignment::TYPE_NAME,
                "employee_id, project_id",
                format!("{}, {}", employee_id, project_id),
            ));
        }

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employee_project (employee_id, project_id, assigned_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(employee_id)
        .bind(project_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            RepositoryError::on_write(
                e,
                Assignment::TYPE_NAME,
                "employee_id, project_id",
                format!("{}, {}", employee_id, project_id),
            )
        })?;

        tx.commit().await?;

        tracing::info!(employee_id, project_id, "Employee assigned to project");
        Ok(assignment.clone().with_id(id).with_assigned_at(now))
    }

    /// Remove an employee from a project
    pub async fn unassign(&self, employee_id: &str, project_id: Id) -> RepositoryResult<()> {
        let employee_id = employee_id.trim();
        let mut tx = self.pool.begin().await?;

        verify_references(&mut tx, employee_id, project_id).await?;

        let result = sqlx::query("DELETE FROM employee_project WHERE employee_id = $1 AND project_id = $2")
            .bind(employee_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                Assignment::TYPE_NAME,
                "employee_id, project_id",
                format!("{}, {}", employee_id, project_id),
            ));
        }

        tx.commit().await?;

        tracing::info!(employee_id, project_id, "Employee removed from project");
        Ok(())
    }

    /// Check if the pair is assigned
    pub async fn exists(&self, employee_id: &str, project_id: Id) -> RepositoryResult<bool> {
        let mut conn = self.pool.acquire().await?;
        pair_exists(&mut conn, employee_id.trim(), project_id).await
    }

    /// Employees assigned to a project, ordered by name
    pub async fn employees_of_project(&self, project_id: Id) -> RepositoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.id, e.first_name, e.last_name, e.job_title, e.salary, e.department_id
            FROM employees e
            JOIN employee_project ep ON ep.employee_id = e.id
            WHERE ep.project_id = $1
            ORDER BY e.last_name ASC, e.first_name ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    /// Projects an employee is assigned to, ordered by name
    pub async fn projects_of_employee(&self, employee_id: &str) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT p.id, p.name, p.description, p.start_date, p.status, p.created_at
            FROM projects p
            JOIN employee_project ep ON ep.project_id = p.id
            WHERE ep.employee_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(employee_id.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    /// All assignments, most recent first
    pub async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, employee_id, project_id, assigned_at
            FROM employee_project
            ORDER BY assigned_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Assignment::try_from).collect()
    }

    pub async fn count(&self) -> RepositoryResult<i64> {
        count_rows::<Assignment>(&self.pool).await
    }
}
