//! # wf-services
//!
//! Application services for Workforce.
//!
//! Every service is bound to a [`ServiceContext`], i.e. an authenticated
//! session. Each operation checks the session's permission for the matching
//! action before it touches the database.

pub mod context;
pub mod departments;
pub mod employees;
pub mod projects;
pub mod reports;
pub mod time_records;
pub mod users;

pub use context::{App, ServiceContext};
pub use departments::DepartmentService;
pub use employees::EmployeeService;
pub use projects::ProjectService;
pub use reports::{Report, ReportKind, ReportService, ReportTarget, TOTAL_HOURS_LABEL};
pub use time_records::TimeRecordService;
pub use users::UserService;
