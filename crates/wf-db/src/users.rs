//! User repository
//!
//! Database operations for user accounts. Password hashes are produced and
//! checked by the credential store; this repository only persists them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use wf_core::traits::{Entity, Id};
use wf_models::{Role, User};

use crate::repository::{count_rows, list_limit, RepositoryError, RepositoryResult};

/// User database entity
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub email: Option<String>,
    pub active: bool,
    pub failed_attempts: i64,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> RepositoryResult<Self> {
        let role: Role = row.role.parse()?;
        let failed_attempts = u32::try_from(row.failed_attempts.max(0)).unwrap_or(u32::MAX);
        Ok(User::new(&row.username, row.password_hash, role, row.email.as_deref())?
            .with_id(row.id)
            .with_created_at(row.created_at)
            .with_login_state(row.active, failed_attempts, row.last_login))
    }
}

/// User repository implementation
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, role, email, active,
                   failed_attempts, last_login, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, role, email, active,
                   failed_attempts, last_login, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// All accounts ordered by username
    pub async fn find_all(&self, limit: i64) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, role, email, active,
                   failed_attempts, last_login, created_at
            FROM users
            ORDER BY username ASC
            LIMIT $1
            "#,
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    pub async fn count(&self) -> RepositoryResult<i64> {
        count_rows::<User>(&self.pool).await
    }

    pub async fn create(&self, user: &User) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE username = $1")
            .bind(user.username())
            .fetch_optional(&mut *tx)
            .await?;
        if taken.is_some() {
            return Err(RepositoryError::duplicate(User::TYPE_NAME, "username", user.username()));
        }

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash, role, email, active, failed_attempts, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.email())
        .bind(user.is_active())
        .bind(i64::from(user.failed_attempts()))
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_write(e, User::TYPE_NAME, "username", user.username()))?;

        tx.commit().await?;

        tracing::info!(id, username = user.username(), role = %user.role(), "User created");
        Ok(user.clone().with_id(id).with_created_at(now))
    }

    pub async fn update_password_hash(&self, id: Id, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(User::TYPE_NAME, "id", id));
        }
        Ok(())
    }

    /// Increment the failure counter; unknown usernames are ignored
    pub async fn record_failed_attempt(&self, username: &str) -> RepositoryResult<()> {
        sqlx::query("UPDATE users SET failed_attempts = failed_attempts + 1 WHERE username = $1")
            .bind(username.trim())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Reset the failure counter and stamp the login time
    pub async fn record_login(&self, id: Id, at: DateTime<Utc>) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET failed_attempts = 0, last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(User::TYPE_NAME, "id", id));
        }
        Ok(())
    }

    pub async fn set_active(&self, id: Id, active: bool) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(User::TYPE_NAME, "id", id));
        }

        tracing::info!(id, active, "User activation changed");
        Ok(())
    }

    /// Reactivate an account and clear its failure counter
    pub async fn unlock(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET active = 1, failed_attempts = 0 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(User::TYPE_NAME, "id", id));
        }

        tracing::info!(id, "User unlocked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn repo() -> (Database, UserRepository) {
        let db = Database::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool().clone());
        (db, repo)
    }

    fn user(name: &str, role: Role) -> User {
        User::new(name, "$argon2id$v=19$stub".to_string(), role, None).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_db, repo) = repo().await;
        let created = repo.create(&user("ana", Role::Supervisor)).await.unwrap();

        let found = repo.find_by_username("ana").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.role(), Role::Supervisor);
        assert!(found.is_active());
        assert_eq!(found.failed_attempts(), 0);
        assert!(found.last_login().is_none());

        assert_eq!(repo.find_by_id(created.id().unwrap()).await.unwrap().unwrap(), created);
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let (_db, repo) = repo().await;
        repo.create(&user("ana", Role::Employee)).await.unwrap();
        let err = repo.create(&user("ana", Role::Admin)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey { field: "username", .. }));
    }

    #[tokio::test]
    async fn test_login_bookkeeping() {
        let (_db, repo) = repo().await;
        let id = repo.create(&user("ana", Role::Employee)).await.unwrap().id().unwrap();

        repo.record_failed_attempt("ana").await.unwrap();
        repo.record_failed_attempt("ana").await.unwrap();
        repo.record_failed_attempt("ghost").await.unwrap();
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().failed_attempts(), 2);

        repo.record_login(id, Utc::now()).await.unwrap();
        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.failed_attempts(), 0);
        assert!(user.last_login().is_some());
    }

    #[tokio::test]
    async fn test_activation() {
        let (_db, repo) = repo().await;
        let id = repo.create(&user("ana", Role::Employee)).await.unwrap().id().unwrap();

        repo.set_active(id, false).await.unwrap();
        repo.record_failed_attempt("ana").await.unwrap();
        assert!(!repo.find_by_id(id).await.unwrap().unwrap().is_active());

        repo.unlock(id).await.unwrap();
        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(user.is_active());
        assert_eq!(user.failed_attempts(), 0);

        assert!(matches!(repo.set_active(99, false).await.unwrap_err(), RepositoryError::NotFound { .. }));
        assert!(matches!(repo.unlock(99).await.unwrap_err(), RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_all_by_username() {
        let (_db, repo) = repo().await;
        for name in ["zoe", "admin", "luis"] {
            repo.create(&user(name, Role::Employee)).await.unwrap();
        }
        let names: Vec<String> = repo
            .find_all(100)
            .await
            .unwrap()
            .iter()
            .map(|u| u.username().to_string())
            .collect();
        assert_eq!(names, vec!["admin", "luis", "zoe"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
