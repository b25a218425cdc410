//! Employee model
//!
//! Table: employees

use serde::Serialize;
use wf_core::error::ValidationErrors;
use wf_core::traits::{Entity, Id, Identifiable};

use crate::validate::{bounded_text, non_negative_amount, required_text, FieldResult, IntoNumber};

/// Maximum width of a national id
pub const EMPLOYEE_ID_MAX_LEN: usize = 12;

/// Employee entity
///
/// Keyed by the externally supplied national id, which never changes after
/// construction. The department reference is checked against storage by the
/// repository at write time.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    id: String,
    first_name: String,
    last_name: String,
    job_title: String,
    salary: f64,
    department_id: Option<Id>,
}

impl Employee {
    pub fn new(
        id: &str,
        first_name: &str,
        last_name: &str,
        job_title: &str,
        salary: impl IntoNumber,
        department_id: Option<Id>,
    ) -> FieldResult<Self> {
        let mut errors = ValidationErrors::new();
        let id = errors.collect(bounded_text("id", id, EMPLOYEE_ID_MAX_LEN));
        let first_name = errors.collect(required_text("first_name", first_name));
        let last_name = errors.collect(required_text("last_name", last_name));
        let job_title = errors.collect(required_text("job_title", job_title));
        let salary = errors.collect(non_negative_amount("salary", salary));
        errors.into_result()?;

        Ok(Self {
            id: id.unwrap_or_default(),
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            job_title: job_title.unwrap_or_default(),
            salary: salary.unwrap_or_default(),
            department_id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn department_id(&self) -> Option<Id> {
        self.department_id
    }

    pub fn set_first_name(&mut self, value: &str) -> FieldResult<()> {
        self.first_name = required_text("first_name", value)?;
        Ok(())
    }

    pub fn set_last_name(&mut self, value: &str) -> FieldResult<()> {
        self.last_name = required_text("last_name", value)?;
        Ok(())
    }

    pub fn set_job_title(&mut self, value: &str) -> FieldResult<()> {
        self.job_title = required_text("job_title", value)?;
        Ok(())
    }

    pub fn set_salary(&mut self, value: impl IntoNumber) -> FieldResult<()> {
        self.salary = non_negative_amount("salary", value)?;
        Ok(())
    }

    pub fn set_department_id(&mut self, department_id: Option<Id>) {
        self.department_id = department_id;
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Employee {}

impl Identifiable for Employee {
    type Key = String;

    /// The national id is always present, even before the first save
    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

impl Entity for Employee {
    const TABLE_NAME: &'static str = "employees";
    const TYPE_NAME: &'static str = "Employee";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        Employee::new("11111111-1", " Ana ", "Rojas", "Engineer", 1_500_000.0, Some(1)).unwrap()
    }

    #[test]
    fn test_new_employee() {
        let emp = sample();
        assert_eq!(emp.id(), "11111111-1");
        assert_eq!(emp.first_name(), "Ana");
        assert_eq!(emp.full_name(), "Ana Rojas");
        assert_eq!(emp.department_id(), Some(1));
    }

    #[test]
    fn test_salary_from_text() {
        let emp = Employee::new("2-7", "Luis", "Soto", "Analyst", "0", None).unwrap();
        assert_eq!(emp.salary(), 0.0);
    }

    #[test]
    fn test_invalid_employee() {
        let errors = Employee::new("", "Ana", " ", "Engineer", -5, None).unwrap_err();
        assert!(errors.has_error("id"));
        assert!(errors.has_error("last_name"));
        assert!(errors.has_error("salary"));
        assert!(!errors.has_error("first_name"));

        assert!(Employee::new("1234567890123", "Ana", "Rojas", "Engineer", 1, None).is_err());
    }

    #[test]
    fn test_setters_validate() {
        let mut emp = sample();
        assert!(emp.set_salary(-1.0).is_err());
        assert_eq!(emp.salary(), 1_500_000.0);
        assert!(emp.set_job_title("").is_err());

        emp.set_salary("2000000").unwrap();
        emp.set_department_id(None);
        assert_eq!(emp.salary(), 2_000_000.0);
        assert_eq!(emp.department_id(), None);
    }

    #[test]
    fn test_identity_equality() {
        let mut other = sample();
        other.set_first_name("Someone").unwrap();
        assert_eq!(sample(), other);
        assert!(sample().is_persisted());
    }
}
