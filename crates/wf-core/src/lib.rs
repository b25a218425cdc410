//! # wf-core
//!
//! Core types, traits, and utilities for Workforce.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - The error taxonomy shared by validators, repositories and the credential store
//! - Result type aliases
//! - Core traits (Identifiable, Entity)
//! - Application configuration

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::*;
pub use result::*;
pub use traits::*;
