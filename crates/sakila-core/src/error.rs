//! # Error Types
//!
//! Domain-specific error types for sakila-core.
//!
//! ## Error Hierarchy
//! ```text
//! sakila-core errors (this file)
//! ├── MoneyError       - Rejected monetary values
//! └── ValidationError  - Input validation failures
//!
//! sakila-db errors (separate crate)
//! └── DbError          - Store operation failures (wraps ValidationError)
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, offending value)
//! 3. Errors are enum variants, never String

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Money Error
// =============================================================================

/// A monetary value that cannot be represented.
///
/// Rental rates and replacement costs are exact non-negative decimals; both
/// properties are enforced at construction so a `Money` in hand is always
/// valid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Input text is not a decimal number.
    #[error("not a decimal amount: {0:?}")]
    Unparsable(String),

    /// Negative amounts have no meaning for rates or costs.
    #[error("money amounts cannot be negative: {0}")]
    Negative(Decimal),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any statement is issued, so a rejected write never reaches
/// the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value exceeds the store's column width.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Invalid format (e.g., email without an @).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Identifier references must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = ValidationError::Required { field: "first_name" };
        assert_eq!(err.to_string(), "first_name is required");

        let err = ValidationError::TooLong {
            field: "email",
            max: 50,
        };
        assert_eq!(err.to_string(), "email must be at most 50 characters");
    }

    #[test]
    fn money_error_messages() {
        let err = MoneyError::Unparsable("abc".to_string());
        assert_eq!(err.to_string(), "not a decimal amount: \"abc\"");
    }
}
