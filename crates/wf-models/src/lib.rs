//! # wf-models
//!
//! Validated domain entities for Workforce.
//!
//! Every entity is built through a constructor that runs the field
//! validators in [`validate`]; setters re-run the same checks, so a value of
//! these types always satisfies its invariants.

pub use wf_core::traits::{Entity, Id, Identifiable, Timestamped};

pub mod validate;

pub mod assignment;
pub mod department;
pub mod employee;
pub mod project;
pub mod time_record;
pub mod user;

pub use assignment::Assignment;
pub use department::Department;
pub use employee::Employee;
pub use project::{Project, ProjectStatus};
pub use time_record::TimeRecord;
pub use user::{Identity, Role, User};
