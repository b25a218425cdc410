//! # wf-db
//!
//! Database layer for Workforce.
//!
//! This crate provides SQLite database access using SQLx, including:
//!
//! - Connection pool management and schema bootstrap
//! - Repository pattern for CRUD operations
//! - Referential and uniqueness checks performed inside one transaction
//!
//! ## Example
//!
//! ```ignore
//! use wf_db::{Database, DepartmentRepository, Repository};
//!
//! let db = Database::connect(&config.database).await?;
//! db.migrate().await?;
//!
//! let repo = DepartmentRepository::new(db.pool().clone());
//! let tech = repo.find_by_name("Tech").await?;
//! ```

pub mod pool;
pub mod repository;
pub mod schema;

pub mod assignments;
pub mod departments;
pub mod employees;
pub mod projects;
pub mod time_records;
pub mod users;

// Re-exports
pub use pool::{Database, IN_MEMORY_URL};
pub use repository::{list_limit, Repository, RepositoryError, RepositoryResult, DEFAULT_LIST_LIMIT};

pub use assignments::{AssignmentRepository, AssignmentRow};
pub use departments::{DepartmentRepository, DepartmentRow};
pub use employees::{EmployeeRepository, EmployeeRow};
pub use projects::{ProjectRepository, ProjectRow};
pub use time_records::{TimeRecordRepository, TimeRecordRow};
pub use users::{UserRepository, UserRow};
