//! Employee repository
//!
//! Database operations for employees.

use async_trait::async_trait;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use wf_core::traits::{Entity, Id};
use wf_models::{Department, Employee};

use crate::departments::department_exists;
use crate::repository::{count_rows, list_limit, Repository, RepositoryError, RepositoryResult};

/// Employee database entity
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub salary: f64,
    pub department_id: Option<i64>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepositoryError;

    fn try_from(row: EmployeeRow) -> RepositoryResult<Self> {
        Ok(Employee::new(
            &row.id,
            &row.first_name,
            &row.last_name,
            &row.job_title,
            row.salary,
            row.department_id,
        )?)
    }
}

/// Employee repository implementation
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find employees of a department
    pub async fn find_by_department(&self, department_id: Id) -> RepositoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, first_name, last_name, job_title, salary, department_id
            FROM employees
            WHERE department_id = $1
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    /// Move an employee to another department, or to none
    pub async fn set_department(&self, employee_id: &str, department_id: Option<Id>) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        if let Some(department_id) = department_id {
            if !department_exists(&mut tx, department_id).await? {
                return Err(RepositoryError::missing(Department::TYPE_NAME, "id", department_id));
            }
        }

        let result = sqlx::query("UPDATE employees SET department_id = $2 WHERE id = $1")
            .bind(employee_id)
            .bind(department_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Employee::TYPE_NAME, "id", employee_id));
        }

        tx.commit().await?;

        tracing::info!(employee_id, ?department_id, "Employee department changed");
        Ok(())
    }
}

/// Check that an employee exists (shared with time records and assignments)
pub(crate) async fn employee_exists(conn: &mut SqliteConnection, id: &str) -> RepositoryResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM employees WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

async fn count_where(conn: &mut SqliteConnection, sql: &str, employee_id: &str) -> RepositoryResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(sql)
        .bind(employee_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

#[async_trait]
impl Repository<Employee> for EmployeeRepository {
    async fn find_by_id(&self, id: &String) -> RepositoryResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, first_name, last_name, job_title, salary, department_id
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Employee::try_from).transpose()
    }

    async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, first_name, last_name, job_title, salary, department_id
            FROM employees
            ORDER BY last_name ASC, first_name ASC
            LIMIT $1
            "#,
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    async fn count(&self) -> RepositoryResult<i64> {
        count_rows::<Employee>(&self.pool).await
    }

    async fn create(&self, employee: &Employee) -> RepositoryResult<Employee> {
        let mut tx = self.pool.begin().await?;

        if employee_exists(&mut tx, employee.id()).await? {
            return Err(RepositoryError::duplicate(Employee::TYPE_NAME, "id", employee.id()));
        }
        if let Some(department_id) = employee.department_id() {
            if !department_exists(&mut tx, department_id).await? {
                return Err(RepositoryError::missing(Department::TYPE_NAME, "id", department_id));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO employees (id, first_name, last_name, job_title, salary, department_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(employee.id())
        .bind(employee.first_name())
        .bind(employee.last_name())
        .bind(employee.job_title())
        .bind(employee.salary())
        .bind(employee.department_id())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Employee::TYPE_NAME, "id", employee.id()))?;

        tx.commit().await?;

        tracing::info!(id = employee.id(), "Employee created");
        Ok(employee.clone())
    }

    async fn update(&self, employee: &Employee) -> RepositoryResult<Employee> {
        let mut tx = self.pool.begin().await?;

        if let Some(department_id) = employee.department_id() {
            if !department_exists(&mut tx, department_id).await? {
                return Err(RepositoryError::missing(Department::TYPE_NAME, "id", department_id));
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = $2, last_name = $3, job_title = $4, salary = $5, department_id = $6
            WHERE id = $1
            "#,
        )
        .bind(employee.id())
        .bind(employee.first_name())
        .bind(employee.last_name())
        .bind(employee.job_title())
        .bind(employee.salary())
        .bind(employee.department_id())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Department::TYPE_NAME, "id", employee.department_id().unwrap_or_default()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Employee::TYPE_NAME, "id", employee.id()));
        }

        tx.commit().await?;

        tracing::info!(id = employee.id(), "Employee updated");
        Ok(employee.clone())
    }

    async fn delete(&self, id: &String) -> RepositoryResult<()> {
        let id = id.trim();
        let mut tx = self.pool.begin().await?;

        if count_where(&mut tx, "SELECT COUNT(*) FROM time_records WHERE employee_id = $1", id).await? > 0 {
            return Err(RepositoryError::still_referenced(Employee::TYPE_NAME, "id", id, "time_records"));
        }
        if count_where(&mut tx, "SELECT COUNT(*) FROM employee_project WHERE employee_id = $1", id).await? > 0 {
            return Err(RepositoryError::still_referenced(Employee::TYPE_NAME, "id", id, "assignments"));
        }

        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::on_delete(e, Employee::TYPE_NAME, "id", id, "time_records"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Employee::TYPE_NAME, "id", id));
        }

        tx.commit().await?;

        tracing::info!(id, "Employee deleted");
        Ok(())
    }

    async fn exists(&self, id: &String) -> RepositoryResult<bool> {
        let mut conn = self.pool.acquire().await?;
        employee_exists(&mut conn, id.trim()).await
    }
}
