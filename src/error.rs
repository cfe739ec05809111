//! Error types for Bookshelf
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (lookup, validation, constraints, storage,
//! configuration) so the HTTP layer can map each one to a status code.
//!
//! ## Categories
//!
//! - **Lookup**: `NotFound` - a requested id does not exist
//! - **Validation**: `MissingRequiredField`, `InvalidInput` - bad request input
//! - **Constraints**: `ConstraintViolation` - unique/foreign key/check failures
//!   reported by SQLite
//! - **Storage**: `DatabaseError`, `MigrationFailed`, `SqlxError`
//! - **Configuration**: `ConfigurationError`
//! - **Export**: `CsvError`, `SerdeJsonError`, `IoError`

use std::fmt;

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type alias using our CatalogError type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Kind of datastore constraint that rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
        };
        f.write_str(name)
    }
}

/// Main error type for Bookshelf
///
/// Every fallible operation in the data access layer, the export module and
/// the HTTP layer returns this type.
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== Lookup Errors =====

    /// Requested entity id does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. "Book"
        entity: &'static str,
        id: i64,
    },

    // ===== Validation Errors =====

    /// Required input key is absent or blank
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Input is malformed or has an unexpected value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ===== Constraint Errors =====

    /// SQLite rejected a write because of a constraint
    #[error("{kind} constraint violated: {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        /// Message reported by the datastore
        message: String,
    },

    // ===== Database Errors =====

    /// Generic database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    // ===== Configuration Errors =====

    /// Configuration value is missing or unusable
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ===== External Library Errors =====

    /// Database driver error from sqlx (non-constraint failures)
    #[error("Database error: {0}")]
    SqlxError(#[source] sqlx::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let kind = match db_err.kind() {
                ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                _ => None,
            };
            if let Some(kind) = kind {
                return CatalogError::ConstraintViolation {
                    kind,
                    message: db_err.message().to_string(),
                };
            }
        }
        CatalogError::SqlxError(err)
    }
}

// Helper methods for creating common errors
impl CatalogError {
    /// Create a NotFound error for an entity id
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CatalogError::NotFound { entity, id }
    }

    /// Create a MissingRequiredField error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        CatalogError::MissingRequiredField(field.into())
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        CatalogError::InvalidInput(message.into())
    }

    /// Check if the error was caused by the request rather than the server
    ///
    /// Returns `true` for lookups of unknown ids, validation failures and
    /// constraint violations. Everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::NotFound { .. }
                | CatalogError::MissingRequiredField(_)
                | CatalogError::InvalidInput(_)
                | CatalogError::ConstraintViolation { .. }
        )
    }

    /// Check if the error is a unique-name conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CatalogError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }

    /// Check if the error is a failed lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// Fail with MissingRequiredField when a required text field is blank
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::missing_field(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CatalogError::not_found("Book", 42);
        assert_eq!(err.to_string(), "Book 42 not found");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_constraint_classification() {
        let err = CatalogError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            message: "UNIQUE constraint failed: publishers.name".to_string(),
        };
        assert!(err.is_conflict());
        assert!(err.is_client_error());
        assert!(err.to_string().starts_with("unique constraint violated"));
    }

    #[test]
    fn test_server_errors_are_not_client_errors() {
        let err = CatalogError::MigrationFailed("boom".to_string());
        assert!(!err.is_client_error());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("title", "Dune").is_ok());
        let err = require_text("title", "   ").unwrap_err();
        assert!(matches!(err, CatalogError::MissingRequiredField(ref f) if f == "title"));
    }
}
