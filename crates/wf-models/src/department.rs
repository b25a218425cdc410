//! Department model
//!
//! Table: departments

use chrono::{DateTime, Utc};
use serde::Serialize;
use wf_core::error::ValidationErrors;
use wf_core::traits::{Entity, Id, Identifiable, Timestamped};

use crate::validate::{optional_text, required_text, FieldResult};

/// Department entity
///
/// The name is unique across departments; uniqueness is enforced by the
/// repository, not here.
#[derive(Debug, Clone, Serialize)]
pub struct Department {
    id: Option<Id>,
    name: String,
    manager: String,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl Department {
    pub fn new(name: &str, manager: &str, description: Option<&str>) -> FieldResult<Self> {
        let mut errors = ValidationErrors::new();
        let name = errors.collect(required_text("name", name));
        let manager = errors.collect(required_text("manager", manager));
        errors.into_result()?;

        Ok(Self {
            id: None,
            name: name.unwrap_or_default(),
            manager: manager.unwrap_or_default(),
            description: optional_text(description),
            created_at: None,
        })
    }

    /// Attach the system-assigned id (used when loading from storage)
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manager(&self) -> &str {
        &self.manager
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_name(&mut self, name: &str) -> FieldResult<()> {
        self.name = required_text("name", name)?;
        Ok(())
    }

    pub fn set_manager(&mut self, manager: &str) -> FieldResult<()> {
        self.manager = required_text("manager", manager)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = optional_text(description);
    }
}

/// Persisted departments compare by id, unsaved ones by name
impl PartialEq for Department {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name == other.name,
            _ => false,
        }
    }
}

impl Identifiable for Department {
    type Key = Id;

    fn key(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Department {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for Department {
    const TABLE_NAME: &'static str = "departments";
    const TYPE_NAME: &'static str = "Department";
}
