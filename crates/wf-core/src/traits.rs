//! Core traits shared by the entity types

use chrono::{DateTime, Utc};

/// System-assigned primary key type
pub type Id = i64;

/// Trait for entities that have a primary key
///
/// Employees carry an externally supplied string key, every other entity a
/// system-assigned integer, so the key type is associated.
pub trait Identifiable {
    type Key: Clone + PartialEq + std::fmt::Display + Send + Sync;

    fn key(&self) -> Option<Self::Key>;

    fn is_persisted(&self) -> bool {
        self.key().is_some()
    }

    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for entities with a creation timestamp
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

/// Base trait for all domain entities
pub trait Entity: Identifiable + Send + Sync {
    /// The database table name
    const TABLE_NAME: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}
