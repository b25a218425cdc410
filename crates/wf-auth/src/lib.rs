//! # wf-auth
//!
//! Authentication and authorization for Workforce.
//!
//! ## Features
//!
//! - Salted Argon2id password hashing with transparent upgrade of legacy digests
//! - Credential store: login, password change, admin bootstrap, deactivation
//! - Role/action permission policy with deny-by-default lookups

pub mod access;
pub mod credentials;
pub mod password;
pub mod policy;

pub use access::AccessControl;
pub use credentials::{CredentialStore, UserStore};
pub use password::{PasswordError, PasswordService};
pub use policy::{allows, has_permission, permitted_actions, Action, UnknownAction};
