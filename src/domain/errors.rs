//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Uniqueness violation with a user-facing message, distinguishable
    /// from generic persistence failures so callers can offer a
    /// corrective action (e.g. "update the existing entry instead").
    Conflict(String),
    /// Caller does not own the mutated resource
    Forbidden,
    /// Validation error with message
    Validation(String),
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Forbidden => write!(f, "Access denied"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// SQLite reports duplicate rows as "UNIQUE constraint failed: ...".
/// Repositories use this to re-signal duplicates as Conflict instead of
/// a generic persistence failure.
pub fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}
