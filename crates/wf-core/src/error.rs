//! Core error types for Workforce
//!
//! One taxonomy is shared by the validators, the repositories and the
//! credential store so the console can render a specific message for each
//! failure.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Core error type for all Workforce operations
#[derive(Error, Debug)]
pub enum WfError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Referential integrity: {entity} with {field}={value} {problem}")]
    Referential {
        entity: &'static str,
        field: &'static str,
        value: String,
        problem: ReferenceProblem,
    },

    #[error("Duplicate key: {entity} with {field}={value} already exists")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Forbidden: role '{role}' may not {action}")]
    Forbidden { role: String, action: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a referential check failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceProblem {
    /// The referenced row does not exist
    Missing,
    /// The row cannot be removed while other rows point at it
    StillReferencedBy(&'static str),
}

impl fmt::Display for ReferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceProblem::Missing => write!(f, "does not exist"),
            ReferenceProblem::StillReferencedBy(by) => write!(f, "is still referenced by {by}"),
        }
    }
}

impl WfError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        WfError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        WfError::DuplicateKey {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn missing_reference(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        WfError::Referential {
            entity,
            field,
            value: value.to_string(),
            problem: ReferenceProblem::Missing,
        }
    }

    pub fn still_referenced(
        entity: &'static str,
        field: &'static str,
        value: impl ToString,
        by: &'static str,
    ) -> Self {
        WfError::Referential {
            entity,
            field,
            value: value.to_string(),
            problem: ReferenceProblem::StillReferencedBy(by),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        WfError::Auth {
            message: message.into(),
        }
    }

    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        WfError::Validation(ValidationErrors::single(field, message))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WfError::Validation(_) => "validation_failed",
            WfError::Referential { .. } => "referential_integrity",
            WfError::DuplicateKey { .. } => "duplicate_key",
            WfError::NotFound { .. } => "not_found",
            WfError::Auth { .. } => "auth_failed",
            WfError::Forbidden { .. } => "forbidden",
            WfError::Storage(_) => "storage_error",
            WfError::Config(_) => "configuration_error",
            WfError::Io(_) => "io_error",
        }
    }

    /// Whether the caller can fix the failure by re-prompting
    ///
    /// Storage, configuration and I/O failures abort the current operation.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            WfError::Storage(_) | WfError::Config(_) | WfError::Io(_)
        )
    }
}

/// Validation errors collection: field name -> messages, plus base errors
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("{}", self.full_messages().join("; "))]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<String>>,
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// Record the error of a single-field check, keeping the checked value on success
    pub fn collect<T>(&mut self, result: Result<T, ValidationErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.merge(errors);
                None
            }
        }
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_merge() {
        let mut errors = ValidationErrors::single("name", "can't be blank");
        errors.merge(ValidationErrors::single("salary", "must not be negative"));
        errors.add_base("record is invalid");

        assert!(errors.has_error("name"));
        assert!(errors.has_error("salary"));
        assert_eq!(
            errors.full_messages(),
            vec![
                "record is invalid".to_string(),
                "name can't be blank".to_string(),
                "salary must not be negative".to_string(),
            ]
        );
    }

    #[test]
    fn test_collect_keeps_value() {
        let mut errors = ValidationErrors::new();
        let ok: Result<i32, ValidationErrors> = Ok(3);
        let bad: Result<i32, ValidationErrors> = Err(ValidationErrors::single("hours", "is invalid"));

        assert_eq!(errors.collect(ok), Some(3));
        assert_eq!(errors.collect(bad), None);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = WfError::missing_reference("Employee", "id", "11111111-1");
        assert_eq!(
            err.to_string(),
            "Referential integrity: Employee with id=11111111-1 does not exist"
        );

        let err = WfError::still_referenced("Department", "id", 4, "employees");
        assert_eq!(
            err.to_string(),
            "Referential integrity: Department with id=4 is still referenced by employees"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(WfError::duplicate("Department", "name", "Tech").is_recoverable());
        assert!(WfError::auth("bad password").is_recoverable());
        assert!(!WfError::Storage("disk I/O error".into()).is_recoverable());
        assert_eq!(WfError::not_found("Project", "id", 9).error_code(), "not_found");
    }
}
