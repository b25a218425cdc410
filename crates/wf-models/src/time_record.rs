//! Time record model
//!
//! Table: time_records

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use wf_core::error::ValidationErrors;
use wf_core::traits::{Entity, Id, Identifiable, Timestamped};

use crate::employee::EMPLOYEE_ID_MAX_LEN;
use crate::validate::{
    bounded_text, date, hours, optional_text, required_text, FieldResult, IntoDate, IntoNumber,
};

/// Hours logged by one employee on one day
///
/// The project is a free-text label and is not checked against the
/// projects table. The employee reference is fixed at construction.
#[derive(Debug, Clone, Serialize)]
pub struct TimeRecord {
    id: Option<Id>,
    employee_id: String,
    work_date: NaiveDate,
    hours: f64,
    project: String,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl TimeRecord {
    pub fn new(
        employee_id: &str,
        work_date: impl IntoDate,
        worked_hours: impl IntoNumber,
        project: &str,
        description: Option<&str>,
    ) -> FieldResult<Self> {
        let mut errors = ValidationErrors::new();
        let employee_id = errors.collect(bounded_text("employee_id", employee_id, EMPLOYEE_ID_MAX_LEN));
        let work_date = errors.collect(date("work_date", work_date));
        let worked_hours = errors.collect(hours("hours", worked_hours));
        let project = errors.collect(required_text("project", project));
        errors.into_result()?;

        match (employee_id, work_date, worked_hours, project) {
            (Some(employee_id), Some(work_date), Some(hours), Some(project)) => Ok(Self {
                id: None,
                employee_id,
                work_date,
                hours,
                project,
                description: optional_text(description),
                created_at: None,
            }),
            _ => Err(ValidationErrors::single("base", "is invalid")),
        }
    }

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

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn work_date(&self) -> NaiveDate {
        self.work_date
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_work_date(&mut self, value: impl IntoDate) -> FieldResult<()> {
        self.work_date = date("work_date", value)?;
        Ok(())
    }

    pub fn set_hours(&mut self, value: impl IntoNumber) -> FieldResult<()> {
        self.hours = hours("hours", value)?;
        Ok(())
    }

    pub fn set_project(&mut self, value: &str) -> FieldResult<()> {
        self.project = required_text("project", value)?;
        Ok(())
    }

    pub fn set_description(&mut self, value: Option<&str>) {
        self.description = optional_text(value);
    }
}

impl PartialEq for TimeRecord {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Identifiable for TimeRecord {
    type Key = Id;

    fn key(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for TimeRecord {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for TimeRecord {
    const TABLE_NAME: &'static str = "time_records";
    const TYPE_NAME: &'static str = "TimeRecord";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_time_record() {
        let record = TimeRecord::new("11111111-1", "2025-03-10", "7.5", " Launch ", Some("kickoff")).unwrap();
        assert_eq!(record.hours(), 7.5);
        assert_eq!(record.project(), "Launch");
        assert_eq!(record.work_date(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert!(record.is_new_record());
    }

    #[test]
    fn test_hours_out_of_range() {
        assert!(TimeRecord::new("1-9", "2025-03-10", 0, "Launch", None).is_err());
        assert!(TimeRecord::new("1-9", "2025-03-10", 25.0, "Launch", None).is_err());
        assert!(TimeRecord::new("1-9", "2025-03-10", 24.0, "Launch", None).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let errors = TimeRecord::new(" ", "10-03-2025", "x", "", None).unwrap_err();
        for field in ["employee_id", "work_date", "hours", "project"] {
            assert!(errors.has_error(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_set_hours() {
        let mut record = TimeRecord::new("1-9", "2025-03-10", 8, "Launch", None).unwrap();
        assert!(record.set_hours(-2).is_err());
        assert_eq!(record.hours(), 8.0);
        record.set_hours(4.25).unwrap();
        assert_eq!(record.hours(), 4.25);
    }

    #[test]
    fn test_unsaved_records_are_distinct() {
        let a = TimeRecord::new("1-9", "2025-03-10", 8, "Launch", None).unwrap();
        assert_ne!(a.clone(), a.clone().with_id(1));
        assert_eq!(a.clone().with_id(3), a.with_id(3));
    }
}
