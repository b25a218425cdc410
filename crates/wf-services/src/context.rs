//! Application entry point and per-session service context

use wf_auth::{AccessControl, Action, CredentialStore, PasswordService};
use wf_core::config::AppConfig;
use wf_core::result::WfResult;
use wf_db::{Database, UserRepository};
use wf_models::Identity;

/// Opened application: database plus configuration
pub struct App {
    db: Database,
    config: AppConfig,
    passwords: PasswordService,
}

impl App {
    /// Connect to the configured database
    pub async fn connect(config: AppConfig) -> WfResult<Self> {
        let db = Database::connect(&config.database)
            .await
            .map_err(wf_db::RepositoryError::from)?;
        Ok(Self::new(db, config))
    }

    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            config,
            passwords: PasswordService::new(),
        }
    }

    /// Replace the hashing service
    pub fn with_password_service(mut self, passwords: PasswordService) -> Self {
        self.passwords = passwords;
        self
    }

    /// Create the schema and the bootstrap administrator
    ///
    /// Returns whether the administrator account was created.
    pub async fn initialize(&self) -> WfResult<bool> {
        self.db.migrate().await?;
        self.credentials().bootstrap().await
    }

    pub fn credentials(&self) -> CredentialStore<UserRepository> {
        CredentialStore::new(UserRepository::new(self.db.pool().clone()), self.config.auth.clone())
            .with_password_service(self.passwords.clone())
    }

    /// Authenticate and open a session
    pub async fn login(&self, username: &str, password: &str) -> WfResult<Option<ServiceContext>> {
        let identity = self.credentials().authenticate(username, password).await?;
        Ok(identity.map(|identity| self.session(identity)))
    }

    /// Session for an already authenticated identity
    pub fn session(&self, identity: Identity) -> ServiceContext {
        ServiceContext {
            db: self.db.clone(),
            config: self.config.clone(),
            passwords: self.passwords.clone(),
            access: AccessControl::new(identity),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// An authenticated session
#[derive(Clone)]
pub struct ServiceContext {
    db: Database,
    config: AppConfig,
    passwords: PasswordService,
    access: AccessControl,
}

impl ServiceContext {
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn identity(&self) -> &Identity {
        self.access.identity()
    }

    pub fn can(&self, action: Action) -> bool {
        self.access.can(action)
    }

    pub fn require(&self, action: Action) -> WfResult<()> {
        self.access.require(action)?;
        tracing::debug!(user = %self.identity().username, %action, "Authorized");
        Ok(())
    }

    pub fn list_limit(&self) -> i64 {
        self.config.list_limit
    }

    pub(crate) fn credentials(&self) -> CredentialStore<UserRepository> {
        CredentialStore::new(UserRepository::new(self.db.pool().clone()), self.config.auth.clone())
            .with_password_service(self.passwords.clone())
    }
}
