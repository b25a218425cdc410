//! Department repository
//!
//! Database operations for departments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use wf_core::traits::{Entity, Id};
use wf_models::Department;

use crate::repository::{count_rows, list_limit, Repository, RepositoryError, RepositoryResult};

/// Department database entity
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
    pub manager: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DepartmentRow> for Department {
    type Error = RepositoryError;

    fn try_from(row: DepartmentRow) -> RepositoryResult<Self> {
        Ok(Department::new(&row.name, &row.manager, row.description.as_deref())?
            .with_id(row.id)
            .with_created_at(row.created_at))
    }
}

/// Department repository implementation
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a department by its unique name
    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, manager, description, created_at
            FROM departments
            WHERE name = $1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Department::try_from).transpose()
    }
}

/// Id of the department called `name`, if any
async fn id_by_name(conn: &mut SqliteConnection, name: &str) -> RepositoryResult<Option<Id>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM departments WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(id)
}

/// Check that a department exists (shared with the employee repository)
pub(crate) async fn department_exists(conn: &mut SqliteConnection, id: Id) -> RepositoryResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

#[async_trait]
impl Repository<Department> for DepartmentRepository {
    async fn find_by_id(&self, id: &Id) -> RepositoryResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, manager, description, created_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Department::try_from).transpose()
    }

    async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, manager, description, created_at
            FROM departments
            ORDER BY name ASC
            LIMIT $1
            "#,
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Department::try_from).collect()
    }

    async fn count(&self) -> RepositoryResult<i64> {
        count_rows::<Department>(&self.pool).await
    }

    async fn create(&self, department: &Department) -> RepositoryResult<Department> {
        let mut tx = self.pool.begin().await?;

        if id_by_name(&mut tx, department.name()).await?.is_some() {
            return Err(RepositoryError::duplicate(Department::TYPE_NAME, "name", department.name()));
        }

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO departments (name, manager, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(department.name())
        .bind(department.manager())
        .bind(department.description())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Department::TYPE_NAME, "name", department.name()))?;

        tx.commit().await?;

        tracing::info!(id, name = department.name(), "Department created");
        Ok(department.clone().with_id(id).with_created_at(now))
    }

    async fn update(&self, department: &Department) -> RepositoryResult<Department> {
        let id = department
            .id()
            .ok_or_else(|| RepositoryError::not_found(Department::TYPE_NAME, "id", "<unsaved>"))?;

        let mut tx = self.pool.begin().await?;

        if let Some(other) = id_by_name(&mut tx, department.name()).await? {
            if other != id {
                return Err(RepositoryError::duplicate(Department::TYPE_NAME, "name", department.name()));
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE departments
            SET name = $2, manager = $3, description = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(department.name())
        .bind(department.manager())
        .bind(department.description())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Department::TYPE_NAME, "name", department.name()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Department::TYPE_NAME, "id", id));
        }

        tx.commit().await?;

        tracing::info!(id, "Department updated");
        Ok(department.clone())
    }

    async fn delete(&self, id: &Id) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE department_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if employees > 0 {
            return Err(RepositoryError::still_referenced(Department::TYPE_NAME, "id", id, "employees"));
        }

        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::on_delete(e, Department::TYPE_NAME, "id", id, "employees"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Department::TYPE_NAME, "id", id));
        }

        tx.commit().await?;

        tracing::info!(id, "Department deleted");
        Ok(())
    }

    async fn exists(&self, id: &Id) -> RepositoryResult<bool> {
        let mut conn = self.pool.acquire().await?;
        department_exists(&mut conn, *id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use wf_core::error::ReferenceProblem;
    use wf_core::traits::Timestamped;

    async fn repo() -> (Database, DepartmentRepository) {
        let db = Database::in_memory().await.unwrap();
        let repo = DepartmentRepository::new(db.pool().clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_db, repo) = repo().await;
        let created = repo
            .create(&Department::new("Tech", "Ana Rojas", Some("Engineering")).unwrap())
            .await
            .unwrap();
        assert!(created.id().is_some());
        assert!(created.created_at().is_some());

        let found = repo.find_by_id(&created.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.description(), Some("Engineering"));

        let by_name = repo.find_by_name(" Tech ").await.unwrap().unwrap();
        assert_eq!(by_name, created);
        assert!(repo.find_by_name("Sales").await.unwrap().is_none());
        assert!(repo.find_by_id(&999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_keeps_first() {
        let (_db, repo) = repo().await;
        repo.create(&Department::new("Tech", "Ana", None).unwrap()).await.unwrap();

        let err = repo
            .create(&Department::new("Tech", "Luis", None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey { field: "name", .. }));

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_name("Tech").await.unwrap().unwrap().manager(), "Ana");
    }

    #[tokio::test]
    async fn test_update() {
        let (_db, repo) = repo().await;
        let mut tech = repo.create(&Department::new("Tech", "Ana", None).unwrap()).await.unwrap();
        let sales = repo.create(&Department::new("Sales", "Luis", None).unwrap()).await.unwrap();

        tech.set_manager("Marta").unwrap();
        repo.update(&tech).await.unwrap();
        let reloaded = repo.find_by_id(&tech.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(reloaded.manager(), "Marta");

        tech.set_name(sales.name()).unwrap();
        assert!(matches!(
            repo.update(&tech).await.unwrap_err(),
            RepositoryError::DuplicateKey { .. }
        ));

        let ghost = Department::new("Ghost", "Nobody", None).unwrap().with_id(42);
        assert!(matches!(
            repo.update(&ghost).await.unwrap_err(),
            RepositoryError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, repo) = repo().await;
        let tech = repo.create(&Department::new("Tech", "Ana", None).unwrap()).await.unwrap();
        let id = tech.id().unwrap();

        sqlx::query(
            "INSERT INTO employees (id, first_name, last_name, job_title, salary, department_id) \
             VALUES ('1-9', 'Ana', 'Rojas', 'Engineer', 10, $1)",
        )
        .bind(id)
        .execute(db.pool())
        .await
        .unwrap();

        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Referential {
                problem: ReferenceProblem::StillReferencedBy("employees"),
                ..
            }
        ));
        assert!(repo.exists(&id).await.unwrap());

        sqlx::query("DELETE FROM employees").execute(db.pool()).await.unwrap();
        repo.delete(&id).await.unwrap();
        assert!(!repo.exists(&id).await.unwrap());

        assert!(matches!(
            repo.delete(&id).await.unwrap_err(),
            RepositoryError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_find_all_ordered_and_limited() {
        let (_db, repo) = repo().await;
        for name in ["Sales", "Admin", "Tech"] {
            repo.create(&Department::new(name, "Boss", None).unwrap()).await.unwrap();
        }

        let names: Vec<String> = repo
            .find_all(100)
            .await
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["Admin", "Sales", "Tech"]);
        assert_eq!(repo.find_all(2).await.unwrap().len(), 2);
    }
}
