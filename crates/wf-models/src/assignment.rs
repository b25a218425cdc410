//! Employee-project assignment
//!
//! Table: employee_project

use chrono::{DateTime, Utc};
use serde::Serialize;
use wf_core::traits::{Entity, Id, Identifiable};

use crate::employee::EMPLOYEE_ID_MAX_LEN;
use crate::validate::{bounded_text, FieldResult};

/// Join between one employee and one project; the pair is unique
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    id: Option<Id>,
    employee_id: String,
    project_id: Id,
    assigned_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn new(employee_id: &str, project_id: Id) -> FieldResult<Self> {
        Ok(Self {
            id: None,
            employee_id: bounded_text("employee_id", employee_id, EMPLOYEE_ID_MAX_LEN)?,
            project_id,
            assigned_at: None,
        })
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_assigned_at(mut self, assigned_at: DateTime<Utc>) -> Self {
        self.assigned_at = Some(assigned_at);
        self
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn project_id(&self) -> Id {
        self.project_id
    }

    pub fn assigned_at(&self) -> Option<DateTime<Utc>> {
        self.assigned_at
    }
}

/// Assignments are identified by their (employee, project) pair
impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.employee_id == other.employee_id && self.project_id == other.project_id
    }
}

impl Identifiable for Assignment {
    type Key = Id;

    fn key(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Assignment {
    const TABLE_NAME: &'static str = "employee_project";
    const TYPE_NAME: &'static str = "Assignment";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_equality() {
        let a = Assignment::new(" 1-9 ", 4).unwrap();
        let b = Assignment::new("1-9", 4).unwrap().with_id(10);
        assert_eq!(a, b);
        assert_ne!(a, Assignment::new("1-9", 5).unwrap());
    }

    #[test]
    fn test_blank_employee_rejected() {
        assert!(Assignment::new("  ", 1).unwrap_err().has_error("employee_id"));
    }
}
