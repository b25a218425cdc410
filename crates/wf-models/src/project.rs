//! Project model
//!
//! Table: projects

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use wf_core::error::ValidationErrors;
use wf_core::traits::{Entity, Id, Identifiable, Timestamped};

use crate::validate::{date, optional_text, required_text, FieldResult, IntoDate};

/// Project status
///
/// Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ProjectStatus {
    #[default]
    Active,
    Paused,
    Finished,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Active, Self::Paused, Self::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationErrors;

    /// Accepts the English names in any case and the legacy stored names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "activo" => Ok(Self::Active),
            "paused" | "pausado" => Ok(Self::Paused),
            "finished" | "finalizado" => Ok(Self::Finished),
            _ => Err(ValidationErrors::single(
                "status",
                "must be one of Active, Paused, Finished",
            )),
        }
    }
}

/// Project entity
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    id: Option<Id>,
    name: String,
    description: Option<String>,
    start_date: NaiveDate,
    status: ProjectStatus,
    created_at: Option<DateTime<Utc>>,
}

impl Project {
    /// New project in the `Active` status
    pub fn new(name: &str, description: Option<&str>, start_date: impl IntoDate) -> FieldResult<Self> {
        let mut errors = ValidationErrors::new();
        let name = errors.collect(required_text("name", name));
        let start_date = errors.collect(date("start_date", start_date));
        errors.into_result()?;

        match (name, start_date) {
            (Some(name), Some(start_date)) => Ok(Self {
                id: None,
                name,
                description: optional_text(description),
                start_date,
                status: ProjectStatus::default(),
                created_at: None,
            }),
            _ => Err(ValidationErrors::single("base", "is invalid")),
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
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

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn set_name(&mut self, name: &str) -> FieldResult<()> {
        self.name = required_text("name", name)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = optional_text(description);
    }

    pub fn set_start_date(&mut self, start_date: impl IntoDate) -> FieldResult<()> {
        self.start_date = date("start_date", start_date)?;
        Ok(())
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    /// Set the status from user or stored text
    pub fn set_status_text(&mut self, status: &str) -> FieldResult<()> {
        self.status = status.parse()?;
        Ok(())
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name == other.name,
            _ => false,
        }
    }
}

impl Identifiable for Project {
    type Key = Id;

    fn key(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_defaults_to_active() {
        let project = Project::new(" Launch ", None, "2025-01-01").unwrap();
        assert_eq!(project.name(), "Launch");
        assert_eq!(project.status(), ProjectStatus::Active);
        assert_eq!(project.start_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_invalid_project() {
        let errors = Project::new("", Some("x"), "yesterday").unwrap_err();
        assert!(errors.has_error("name"));
        assert!(errors.has_error("start_date"));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("paused".parse::<ProjectStatus>().unwrap(), ProjectStatus::Paused);
        assert_eq!("Finalizado".parse::<ProjectStatus>().unwrap(), ProjectStatus::Finished);
        assert_eq!(" ACTIVE ".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert!("Cancelled".parse::<ProjectStatus>().unwrap_err().has_error("status"));
    }

    #[test]
    fn test_any_status_transition() {
        let mut project = Project::new("Launch", None, "2025-01-01").unwrap();
        project.set_status(ProjectStatus::Finished);
        project.set_status_text("Active").unwrap();
        assert_eq!(project.status(), ProjectStatus::Active);
        assert!(project.set_status_text("Archived").is_err());
        assert_eq!(project.status(), ProjectStatus::Active);
    }
}
