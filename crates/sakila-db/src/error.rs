//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! MySQL error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module) ← classifies constraint violations, pool state
//!      │
//!      ▼
//! Presentation shell ← renders a user-facing message per variant
//! ```
//!
//! The layer never recovers from these locally: every error propagates to
//! the caller as a typed result, and nothing is retried automatically.

use std::time::Duration;

use thiserror::Error;

use sakila_core::ValidationError;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An operation was attempted with no live connection.
    ///
    /// Never auto-reconnects: callers can tell "never connected" apart from
    /// "query failed" and decide when to re-establish.
    #[error("not connected to the database")]
    NotConnected,

    /// A lookup by identity yielded no row where one was expected
    /// (film detail, return processing, updates keyed by id).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An insert produced no generated identity, so a dependent insert
    /// cannot proceed.
    #[error("insert into {entity} produced no generated id")]
    InsertFailed { entity: &'static str },

    /// A write was rejected by the store's referential or uniqueness rules.
    /// Surfaced distinctly from generic failure so callers can explain it.
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Transport-level failure during connect or statement execution.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The bounded per-operation budget expired. The statement already
    /// issued is not retracted; only the wait is abandoned.
    #[error("operation timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// No pooled connection became available within the acquire budget.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Any other statement failure reported by the store.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Write input rejected before any statement was issued.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn insert_failed(entity: &'static str) -> Self {
        DbError::InsertFailed { entity }
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound  → DbError::NotFound
/// sqlx::Error::Database     → SQLSTATE 23xxx ⇒ ConstraintViolation
/// sqlx::Error::PoolTimedOut → DbError::PoolExhausted
/// sqlx::Error::PoolClosed   → DbError::NotConnected
/// sqlx::Error::Io / Tls     → DbError::ConnectionFailed
/// Other                     → DbError::QueryFailed
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                classify_database_error(db_err.code().as_deref(), db_err.message())
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::NotConnected,
            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),
            sqlx::Error::Tls(tls_err) => DbError::ConnectionFailed(tls_err.to_string()),
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

/// Maps a store-reported error to the taxonomy.
///
/// MySQL reports every integrity rejection under SQLSTATE class 23
/// (1062 duplicate key, 1451/1452 foreign key, 1216/1217 legacy FK codes);
/// the message is kept verbatim for diagnostics. Everything else is a plain
/// query failure.
pub(crate) fn classify_database_error(sqlstate: Option<&str>, message: &str) -> DbError {
    let is_integrity = sqlstate.is_some_and(|code| code.starts_with("23"))
        || message.contains("foreign key constraint")
        || message.contains("Duplicate entry");

    if is_integrity {
        DbError::ConstraintViolation {
            message: message.to_string(),
        }
    } else {
        DbError::QueryFailed(message.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_sqlstate_maps_to_constraint_violation() {
        let err = classify_database_error(
            Some("23000"),
            "Cannot delete or update a parent row: a foreign key constraint fails",
        );
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[test]
    fn duplicate_entry_without_sqlstate_still_classifies() {
        let err = classify_database_error(None, "Duplicate entry 'MARY' for key 'idx_name'");
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[test]
    fn other_errors_stay_query_failures() {
        let err = classify_database_error(Some("42S02"), "Table 'sakila.flim' doesn't exist");
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[test]
    fn validation_errors_convert() {
        let validation = ValidationError::Required { field: "first_name" };
        let err: DbError = validation.into();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert_eq!(err.to_string(), "invalid input: first_name is required");
    }

    #[test]
    fn not_found_carries_entity_and_id() {
        let err = DbError::not_found("film", 812);
        assert_eq!(err.to_string(), "film not found: 812");
    }
}
