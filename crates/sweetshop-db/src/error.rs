//! # Store Errors
//!
//! ```text
//!   sqlx::Error ──────┐
//!   MigrateError ─────┼──► DbError ──► ApiError (apps/api)
//!   CoreError ────────┘      │
//!   ValidationError ─────────┘ (as Domain)
//! ```
//!
//! Inventory rule failures (insufficient stock, bad quantities) travel as
//! [`DbError::Domain`] so the HTTP layer can tell them apart from storage
//! faults.

use sweetshop_core::{CoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write. `field` is the column name.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Inventory or input rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Could not open or create the SQLite file.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite refused the statement (including CHECK constraints).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

/// Column named by SQLite's `UNIQUE constraint failed: <table>.<column>`.
fn unique_column(message: &str) -> Option<&str> {
    let target = message.strip_prefix("UNIQUE constraint failed: ")?;
    let first = target.split(',').next()?.trim();
    Some(first.rsplit('.').next().unwrap_or(first))
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),

            sqlx::Error::Database(db_err) => match unique_column(db_err.message()) {
                // The offending value is not in the message; callers that
                // know it re-wrap with `DbError::duplicate`.
                Some(column) => DbError::duplicate(column, "unknown"),
                None => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_column() {
        assert_eq!(
            unique_column("UNIQUE constraint failed: accounts.email"),
            Some("email")
        );
        assert_eq!(
            unique_column("UNIQUE constraint failed: items.name, items.category"),
            Some("name")
        );
        assert_eq!(unique_column("CHECK constraint failed: quantity >= 0"), None);
    }

    #[test]
    fn test_validation_becomes_domain() {
        let err: DbError = ValidationError::MustBePositive {
            field: "quantity".into(),
        }
        .into();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert_eq!(err.to_string(), "Validation error: quantity must be positive");
    }
}
