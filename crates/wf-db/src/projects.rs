//! Project repository
//!
//! Database operations for projects.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use wf_core::traits::{Entity, Id};
use wf_models::{Project, ProjectStatus};

use crate::repository::{count_rows, list_limit, Repository, RepositoryError, RepositoryResult};

/// Project database entity
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> RepositoryResult<Self> {
        let status: ProjectStatus = row.status.parse()?;
        Ok(Project::new(&row.name, row.description.as_deref(), row.start_date)?
            .with_id(row.id)
            .with_status(status)
            .with_created_at(row.created_at))
    }
}

/// Project repository implementation
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a project by name, ignoring case
    ///
    /// An exact match wins when names differ only in case.
    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Project>> {
        let name = name.trim();
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, start_date, status, created_at
            FROM projects
            WHERE UPPER(name) = UPPER($1)
            ORDER BY name = $2 DESC, id
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    /// Find projects in a status, most recent start first
    pub async fn find_by_status(&self, status: ProjectStatus) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, start_date, status, created_at
            FROM projects
            WHERE status = $1
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }
}

async fn id_by_name(conn: &mut SqliteConnection, name: &str) -> RepositoryResult<Option<Id>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM projects WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(id)
}

/// Check that a project exists (shared with the assignment repository)
pub(crate) async fn project_exists(conn: &mut SqliteConnection, id: Id) -> RepositoryResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

#[async_trait]
impl Repository<Project> for ProjectRepository {
    async fn find_by_id(&self, id: &Id) -> RepositoryResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, start_date, status, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, start_date, status, created_at
            FROM projects
            ORDER BY start_date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn count(&self) -> RepositoryResult<i64> {
        count_rows::<Project>(&self.pool).await
    }

    async fn create(&self, project: &Project) -> RepositoryResult<Project> {
        let mut tx = self.pool.begin().await?;

        if id_by_name(&mut tx, project.name()).await?.is_some() {
            return Err(RepositoryError::duplicate(Project::TYPE_NAME, "name", project.name()));
        }

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO projects (name, description, start_date, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(project.name())
        .bind(project.description())
        .bind(project.start_date())
        .bind(project.status().as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Project::TYPE_NAME, "name", project.name()))?;

        tx.commit().await?;

        tracing::info!(id, name = project.name(), "Project created");
        Ok(project.clone().with_id(id).with_created_at(now))
    }

    async fn update(&self, project: &Project) -> RepositoryResult<Project> {
        let id = project
            .id()
            .ok_or_else(|| RepositoryError::not_found(Project::TYPE_NAME, "id", "<unsaved>"))?;

        let mut tx = self.pool.begin().await?;

        if let Some(other) = id_by_name(&mut tx, project.name()).await? {
            if other != id {
                return Err(RepositoryError::duplicate(Project::TYPE_NAME, "name", project.name()));
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $2, description = $3, start_date = $4, status = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(project.name())
        .bind(project.description())
        .bind(project.start_date())
        .bind(project.status().as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, Project::TYPE_NAME, "name", project.name()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Project::TYPE_NAME, "id", id));
        }

        tx.commit().await?;

        tracing::info!(id, status = %project.status(), "Project updated");
        Ok(project.clone())
    }

    /// Delete a project together with its assignments
    async fn delete(&self, id: &Id) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let unassigned = sqlx::query("DELETE FROM employee_project WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Project::TYPE_NAME, "id", id));
        }

        tx.commit().await?;

        tracing::info!(id, unassigned, "Project deleted");
        Ok(())
    }

    async fn exists(&self, id: &Id) -> RepositoryResult<bool> {
        let mut conn = self.pool.acquire().await?;
        project_exists(&mut conn, *id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn repo() -> (Database, ProjectRepository) {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(db.pool().clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_db, repo) = repo().await;
        let launch = repo
            .create(&Project::new("Launch", Some("Go live"), "2025-01-01").unwrap())
            .await
            .unwrap();

        let found = repo.find_by_id(&launch.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(found, launch);
        assert_eq!(found.status(), ProjectStatus::Active);
        assert_eq!(found.start_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(repo.find_by_name("Launch").await.unwrap().unwrap(), launch);
    }

    #[tokio::test]
    async fn test_find_by_name_ignores_case() {
        let (_db, repo) = repo().await;
        let launch = repo
            .create(&Project::new("Launch", None, "2025-01-01").unwrap())
            .await
            .unwrap();

        assert_eq!(repo.find_by_name("launch").await.unwrap().unwrap(), launch);
        assert_eq!(repo.find_by_name(" LAUNCH ").await.unwrap().unwrap(), launch);

        let shouting = repo
            .create(&Project::new("LAUNCH", None, "2025-02-01").unwrap())
            .await
            .unwrap();
        assert_eq!(repo.find_by_name("LAUNCH").await.unwrap().unwrap(), shouting);
        assert_eq!(repo.find_by_name("Launch").await.unwrap().unwrap(), launch);
        assert!(repo.find_by_name("launc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let (_db, repo) = repo().await;
        repo.create(&Project::new("Launch", None, "2025-01-01").unwrap()).await.unwrap();
        let err = repo
            .create(&Project::new("Launch", None, "2025-06-01").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey { entity: "Project", .. }));
    }

    #[tokio::test]
    async fn test_status_update_and_filter() {
        let (_db, repo) = repo().await;
        let mut launch = repo.create(&Project::new("Launch", None, "2025-01-01").unwrap()).await.unwrap();
        repo.create(&Project::new("Audit", None, "2025-02-01").unwrap()).await.unwrap();

        launch.set_status(ProjectStatus::Paused);
        repo.update(&launch).await.unwrap();

        let paused = repo.find_by_status(ProjectStatus::Paused).await.unwrap();
        assert_eq!(paused, vec![launch]);
        assert_eq!(repo.find_by_status(ProjectStatus::Active).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let (_db, repo) = repo().await;
        repo.create(&Project::new("Old", None, "2024-01-01").unwrap()).await.unwrap();
        repo.create(&Project::new("New", None, "2025-01-01").unwrap()).await.unwrap();

        let names: Vec<String> = repo
            .find_all(10)
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_assignments() {
        let (db, repo) = repo().await;
        let launch = repo.create(&Project::new("Launch", None, "2025-01-01").unwrap()).await.unwrap();
        let id = launch.id().unwrap();

        sqlx::query(
            "INSERT INTO employees (id, first_name, last_name, job_title, salary) \
             VALUES ('1-9', 'Ana', 'Rojas', 'Engineer', 10)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO employee_project (employee_id, project_id, assigned_at) \
             VALUES ('1-9', $1, '2025-01-02T00:00:00Z')",
        )
        .bind(id)
        .execute(db.pool())
        .await
        .unwrap();

        repo.delete(&id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee_project")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(!repo.exists(&id).await.unwrap());
        assert!(matches!(repo.delete(&id).await.unwrap_err(), RepositoryError::NotFound { .. }));
    }
}
