//! # Validation Module
//!
//! Field checks against the sakila schema's column widths, run before any
//! statement is issued. The store enforces the same limits with NOT NULL
//! constraints and VARCHAR widths; rejecting bad input here keeps those
//! failures out of the wire protocol and gives callers a typed error with
//! the offending field named.
//!
//! Form-level UX (which field to highlight, when to re-check) is the
//! caller's concern; this module only answers "would the store accept it".

use crate::error::ValidationError;
use crate::{
    MAX_ADDRESS_LEN, MAX_DISTRICT_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PHONE_LEN,
    MAX_POSTAL_CODE_LEN, MAX_USERNAME_LEN,
};

/// Result type for validation operations.
pub type ValidationResult = Result<(), ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a person-name column (`first_name` / `last_name`, VARCHAR(45)).
pub fn validate_name(field: &'static str, value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates an optional email column (VARCHAR(50)).
///
/// Absent and empty both mean "no email"; a present value must fit the
/// column and carry an `@`.
pub fn validate_email(value: Option<&str>) -> ValidationResult {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    if value.chars().count() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LEN,
        });
    }
    if !value.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "missing @",
        });
    }
    Ok(())
}

/// Validates a staff login handle (VARCHAR(16)).
pub fn validate_username(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field: "username" });
    }
    if value.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LEN,
        });
    }
    Ok(())
}

/// Validates a foreign-key reference supplied by the caller.
pub fn validate_id(field: &'static str, value: i64) -> ValidationResult {
    if value <= 0 {
        return Err(ValidationError::MustBePositive { field });
    }
    Ok(())
}

/// Validates the address fields that become a new `address` row.
pub fn validate_address(
    address: &str,
    district: &str,
    postal_code: &str,
    phone: &str,
) -> ValidationResult {
    if address.trim().is_empty() {
        return Err(ValidationError::Required { field: "address" });
    }
    check_len("address", address, MAX_ADDRESS_LEN)?;
    check_len("district", district, MAX_DISTRICT_LEN)?;
    check_len("postal_code", postal_code, MAX_POSTAL_CODE_LEN)?;
    check_len("phone", phone, MAX_PHONE_LEN)
}

fn check_len(field: &'static str, value: &str, max: usize) -> ValidationResult {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(validate_name("first_name", "MARY").is_ok());
        assert_eq!(
            validate_name("first_name", "   "),
            Err(ValidationError::Required { field: "first_name" })
        );
        assert_eq!(
            validate_name("last_name", &"X".repeat(46)),
            Err(ValidationError::TooLong {
                field: "last_name",
                max: MAX_NAME_LEN
            })
        );
    }

    #[test]
    fn email_rules() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("mary.smith@sakilacustomer.org")).is_ok());
        assert_eq!(
            validate_email(Some("not-an-email")),
            Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "missing @"
            })
        );
        let long = format!("{}@x.org", "a".repeat(MAX_EMAIL_LEN));
        assert!(matches!(
            validate_email(Some(&long)),
            Err(ValidationError::TooLong { field: "email", .. })
        ));
    }

    #[test]
    fn id_rules() {
        assert!(validate_id("store_id", 1).is_ok());
        assert_eq!(
            validate_id("store_id", 0),
            Err(ValidationError::MustBePositive { field: "store_id" })
        );
        assert!(validate_id("city_id", -4).is_err());
    }

    #[test]
    fn address_rules() {
        assert!(validate_address("1913 Hanoi Way", "Nagasaki", "35200", "28303384290").is_ok());
        assert_eq!(
            validate_address("", "Nagasaki", "35200", ""),
            Err(ValidationError::Required { field: "address" })
        );
        assert!(matches!(
            validate_address("ok", &"d".repeat(21), "", ""),
            Err(ValidationError::TooLong {
                field: "district",
                ..
            })
        ));
    }
}
