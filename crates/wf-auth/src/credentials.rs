//! Credential store
//!
//! Authenticates users, changes passwords and maintains the login
//! bookkeeping on top of a [`UserStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wf_core::config::AuthConfig;
use wf_core::error::{ValidationErrors, WfError};
use wf_core::result::{OrNotFound, WfResult};
use wf_core::traits::Id;
use wf_db::UserRepository;
use wf_models::user::{validate_email, validate_password, validate_username};
use wf_models::{Identity, Role, User};

use crate::password::PasswordService;

/// Username of the bootstrap administrator
pub const ADMIN_USERNAME: &str = "admin";

/// Persistence operations the credential store relies on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Id) -> WfResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> WfResult<Option<User>>;
    async fn list(&self) -> WfResult<Vec<User>>;
    async fn count(&self) -> WfResult<i64>;
    async fn insert(&self, user: &User) -> WfResult<User>;
    async fn update_password_hash(&self, id: Id, password_hash: &str) -> WfResult<()>;
    async fn record_failed_attempt(&self, username: &str) -> WfResult<()>;
    async fn record_login(&self, id: Id, at: DateTime<Utc>) -> WfResult<()>;
    async fn set_active(&self, id: Id, active: bool) -> WfResult<()>;
    async fn unlock(&self, id: Id) -> WfResult<()>;
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Id) -> WfResult<Option<User>> {
        Ok(UserRepository::find_by_id(self, id).await?)
    }

    async fn find_by_username(&self, username: &str) -> WfResult<Option<User>> {
        Ok(UserRepository::find_by_username(self, username).await?)
    }

    async fn list(&self) -> WfResult<Vec<User>> {
        Ok(self.find_all(i64::MAX).await?)
    }

    async fn count(&self) -> WfResult<i64> {
        Ok(UserRepository::count(self).await?)
    }

    async fn insert(&self, user: &User) -> WfResult<User> {
        Ok(self.create(user).await?)
    }

    async fn update_password_hash(&self, id: Id, password_hash: &str) -> WfResult<()> {
        Ok(UserRepository::update_password_hash(self, id, password_hash).await?)
    }

    async fn record_failed_attempt(&self, username: &str) -> WfResult<()> {
        Ok(UserRepository::record_failed_attempt(self, username).await?)
    }

    async fn record_login(&self, id: Id, at: DateTime<Utc>) -> WfResult<()> {
        Ok(UserRepository::record_login(self, id, at).await?)
    }

    async fn set_active(&self, id: Id, active: bool) -> WfResult<()> {
        Ok(UserRepository::set_active(self, id, active).await?)
    }

    async fn unlock(&self, id: Id) -> WfResult<()> {
        Ok(UserRepository::unlock(self, id).await?)
    }
}

/// Credential store
pub struct CredentialStore<S: UserStore> {
    store: S,
    passwords: PasswordService,
    settings: AuthConfig,
}

impl<S: UserStore> CredentialStore<S> {
    pub fn new(store: S, settings: AuthConfig) -> Self {
        Self {
            store,
            passwords: PasswordService::new(),
            settings,
        }
    }

    /// Replace the hashing service
    pub fn with_password_service(mut self, passwords: PasswordService) -> Self {
        self.passwords = passwords;
        self
    }

    pub fn settings(&self) -> &AuthConfig {
        &self.settings
    }

    /// Check a username/password pair
    ///
    /// Returns the identity on success. Every failure yields `None`, whatever
    /// the reason, and bumps the failure counter of an existing account. A
    /// successful login resets the counter and stamps the login time.
    pub async fn authenticate(&self, username: &str, password: &str) -> WfResult<Option<Identity>> {
        let username = username.trim();
        let Some(user) = self.store.find_by_username(username).await? else {
            tracing::warn!(username, "Login failed");
            return Ok(None);
        };

        let refused = if !user.is_active() {
            Some("inactive")
        } else if user.is_locked_out(self.settings.max_failed_attempts) {
            Some("locked out")
        } else if !self.passwords.verify(password, user.password_hash()) {
            Some("bad password")
        } else {
            None
        };

        if let Some(reason) = refused {
            self.store.record_failed_attempt(username).await?;
            tracing::warn!(
                username,
                reason,
                failed_attempts = user.failed_attempts().saturating_add(1),
                "Login failed"
            );
            return Ok(None);
        }

        let Some(identity) = user.identity() else {
            return Ok(None);
        };

        self.store.record_login(identity.id, Utc::now()).await?;

        // the login is already recorded; a failed upgrade leaves the legacy hash for next time
        if PasswordService::needs_rehash(user.password_hash()) {
            match self.upgrade_hash(identity.id, password).await {
                Ok(()) => tracing::info!(username, "Legacy password hash upgraded"),
                Err(err) => tracing::warn!(username, error = %err, "Legacy password hash upgrade failed"),
            }
        }

        tracing::info!(username, role = %identity.role, "Login succeeded");
        Ok(Some(identity))
    }

    async fn upgrade_hash(&self, user_id: Id, password: &str) -> WfResult<()> {
        let upgraded = self.passwords.hash(password)?;
        self.store.update_password_hash(user_id, &upgraded).await
    }

    /// Replace a user's password after checking the current one
    pub async fn change_password(&self, user_id: Id, current: &str, new: &str) -> WfResult<()> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .or_not_found("User", "id", user_id)?;

        if !self.passwords.verify(current, user.password_hash()) {
            tracing::warn!(username = user.username(), "Password change refused");
            return Err(WfError::auth("current password is incorrect"));
        }

        validate_password(new, self.settings.password_min_length)?;

        let hash = self.passwords.hash(new)?;
        self.store.update_password_hash(user_id, &hash).await?;

        tracing::info!(username = user.username(), "Password changed");
        Ok(())
    }

    /// Create the administrator account when no user exists yet
    ///
    /// Returns whether the account was created.
    pub async fn bootstrap(&self) -> WfResult<bool> {
        if self.store.count().await? > 0 {
            return Ok(false);
        }

        let hash = self.passwords.hash(&self.settings.admin_password)?;
        let admin = User::new(ADMIN_USERNAME, hash, Role::Admin, Some(&self.settings.admin_email))?;
        self.store.insert(&admin).await?;

        tracing::warn!(
            username = ADMIN_USERNAME,
            "Created the initial administrator account; change its password"
        );
        Ok(true)
    }

    /// Disable an account; it can no longer log in
    pub async fn deactivate(&self, user_id: Id) -> WfResult<()> {
        self.store.set_active(user_id, false).await?;
        tracing::info!(user_id, "User deactivated");
        Ok(())
    }

    /// Re-enable an account and clear its failure counter
    pub async fn unlock(&self, user_id: Id) -> WfResult<()> {
        self.store.unlock(user_id).await
    }

    /// Create an account with a freshly hashed password
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        email: Option<&str>,
    ) -> WfResult<User> {
        let mut errors = ValidationErrors::new();
        errors.collect(validate_username(username));
        errors.collect(validate_email(email));
        errors.collect(validate_password(password, self.settings.password_min_length));
        errors.into_result()?;

        let hash = self.passwords.hash(password)?;
        let user = User::new(username, hash, role, email)?;
        self.store.insert(&user).await
    }

    /// All accounts ordered by username
    pub async fn list_users(&self) -> WfResult<Vec<User>> {
        self.store.list().await
    }

    pub async fn find_user(&self, user_id: Id) -> WfResult<Option<User>> {
        self.store.find_by_id(user_id).await
    }
}
