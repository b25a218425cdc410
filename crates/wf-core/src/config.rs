//! Configuration types and loading
//!
//! The configuration is read once at process start and handed to the
//! components that need it; nothing reads the environment afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::WfError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub reports: ReportConfig,
    /// Row cap for list operations
    pub list_limit: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Initial password of the bootstrap administrator
    pub admin_password: String,
    pub admin_email: String,
    /// Password minimum length
    pub password_min_length: usize,
    /// Refuse logins once this many consecutive failures are recorded.
    /// `None` only counts failures.
    pub max_failed_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Directory CSV exports are written to
    pub directory: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            reports: ReportConfig {
                directory: PathBuf::from("informes"),
            },
            list_limit: 100,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://workforce.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: "admin123".to_string(),
            admin_email: "admin@empresa.com".to_string(),
            password_min_length: 6,
            max_failed_attempts: None,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for WfError {
    fn from(err: ConfigError) -> Self {
        WfError::Config(err.to_string())
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Database
        if let Some(url) = lookup("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            config.database.max_connections = parse_number("DB_MAX_CONNECTIONS", &max)?;
        }

        // Auth
        if let Some(password) = lookup("WORKFORCE_ADMIN_PASSWORD") {
            config.auth.admin_password = password;
        }
        if let Some(email) = lookup("WORKFORCE_ADMIN_EMAIL") {
            config.auth.admin_email = email;
        }
        if let Some(len) = lookup("WORKFORCE_PASSWORD_MIN_LENGTH") {
            config.auth.password_min_length = parse_number("WORKFORCE_PASSWORD_MIN_LENGTH", &len)?;
        }
        if let Some(max) = lookup("WORKFORCE_MAX_FAILED_ATTEMPTS") {
            let max = max.trim();
            if !max.is_empty() && max != "0" {
                config.auth.max_failed_attempts =
                    Some(parse_number("WORKFORCE_MAX_FAILED_ATTEMPTS", max)?);
            }
        }

        // Reports
        if let Some(dir) = lookup("WORKFORCE_REPORTS_DIR") {
            config.reports.directory = PathBuf::from(dir);
        }

        if let Some(limit) = lookup("WORKFORCE_LIST_LIMIT") {
            config.list_limit = parse_number("WORKFORCE_LIST_LIMIT", &limit)?;
            if config.list_limit <= 0 {
                return Err(ConfigError::InvalidValue {
                    key: "WORKFORCE_LIST_LIMIT".to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }

        tracing::debug!(
            database = %config.database.url,
            lockout = ?config.auth.max_failed_attempts,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Replace the database URL (command-line override)
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
