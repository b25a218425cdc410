//! User accounts and roles
//!
//! Table: users

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use wf_core::error::ValidationErrors;
use wf_core::traits::{Entity, Id, Identifiable, Timestamped};

use crate::validate::{optional_text, FieldResult};

/// Default minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 6;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{3,50}$").expect("valid regex"));

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Supervisor,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Admin, Self::Supervisor, Self::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationErrors;

    /// `empleado` is the legacy tag of the employee role
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "employee" | "empleado" => Ok(Self::Employee),
            _ => Err(ValidationErrors::single(
                "role",
                "must be one of admin, supervisor, employee",
            )),
        }
    }
}

/// Username: 3-50 characters of letters, digits, `.`, `_` or `-`
pub fn validate_username(username: &str) -> FieldResult<String> {
    let username = username.trim();
    if !USERNAME_PATTERN.is_match(username) {
        return Err(ValidationErrors::single(
            "username",
            "must be 3-50 characters of letters, digits, '.', '_' or '-'",
        ));
    }
    Ok(username.to_string())
}

/// Optional email; blank means none
pub fn validate_email(email: Option<&str>) -> FieldResult<Option<String>> {
    match optional_text(email) {
        Some(email) if !validator::validate_email(email.as_str()) => {
            Err(ValidationErrors::single("email", "is not a valid address"))
        }
        email => Ok(email),
    }
}

/// Plaintext password length check (the password itself is never stored)
pub fn validate_password(password: &str, min_length: usize) -> FieldResult<()> {
    if password.chars().count() < min_length {
        return Err(ValidationErrors::single(
            "password",
            format!("is too short (minimum is {} characters)", min_length),
        ));
    }
    Ok(())
}

/// User account
///
/// Holds the password hash only. Login bookkeeping (`active`,
/// `failed_attempts`, `last_login`) is maintained by the credential store.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: Option<Id>,
    username: String,
    #[serde(skip_serializing)]
    password_hash: String,
    role: Role,
    email: Option<String>,
    active: bool,
    failed_attempts: u32,
    last_login: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
}

impl User {
    /// New active account with no recorded logins
    pub fn new(username: &str, password_hash: String, role: Role, email: Option<&str>) -> FieldResult<Self> {
        let mut errors = ValidationErrors::new();
        let username = errors.collect(validate_username(username));
        let email = errors.collect(validate_email(email));
        if password_hash.is_empty() {
            errors.add("password_hash", "can't be blank");
        }
        errors.into_result()?;

        Ok(Self {
            id: None,
            username: username.unwrap_or_default(),
            password_hash,
            role,
            email: email.flatten(),
            active: true,
            failed_attempts: 0,
            last_login: None,
            created_at: None,
        })
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Restore login bookkeeping loaded from storage
    pub fn with_login_state(
        mut self,
        active: bool,
        failed_attempts: u32,
        last_login: Option<DateTime<Utc>>,
    ) -> Self {
        self.active = active;
        self.failed_attempts = failed_attempts;
        self.last_login = last_login;
        self
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Whether the failure counter has reached `threshold`
    pub fn is_locked_out(&self, threshold: Option<u32>) -> bool {
        threshold.is_some_and(|max| self.failed_attempts >= max)
    }

    /// The session identity of a persisted account
    pub fn identity(&self) -> Option<Identity> {
        self.id.map(|id| Identity {
            id,
            username: self.username.clone(),
            role: self.role,
            email: self.email.clone(),
        })
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.username == other.username,
            _ => false,
        }
    }
}

impl Identifiable for User {
    type Key = Id;

    fn key(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

/// Authenticated session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: Id,
    pub username: String,
    pub role: Role,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Empleado".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Supervisor.to_string(), "supervisor");
    }

    #[test]
    fn test_username_pattern() {
        assert_eq!(validate_username(" ana.rojas ").unwrap(), "ana.rojas");
        assert!(validate_username("ab").is_err());
        assert!(validate_username("ana rojas").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_email() {
        assert_eq!(validate_email(Some(" ")).unwrap(), None);
        assert_eq!(
            validate_email(Some("admin@empresa.com")).unwrap().as_deref(),
            Some("admin@empresa.com")
        );
        assert!(validate_email(Some("not-an-email")).is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345", PASSWORD_MIN_LENGTH).is_err());
        assert!(validate_password("123456", PASSWORD_MIN_LENGTH).is_ok());
    }

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("admin", "$argon2id$stub".into(), Role::Admin, None).unwrap();
        assert!(user.is_active());
        assert_eq!(user.failed_attempts(), 0);
        assert!(user.identity().is_none());

        let identity = user.with_id(1).identity().unwrap();
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_lockout_threshold() {
        let user = User::new("ana", "hash".into(), Role::Employee, None)
            .unwrap()
            .with_login_state(true, 3, None);
        assert!(!user.is_locked_out(None));
        assert!(!user.is_locked_out(Some(4)));
        assert!(user.is_locked_out(Some(3)));
    }
}
