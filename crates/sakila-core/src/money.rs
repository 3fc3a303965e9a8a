//! # Money Module
//!
//! Provides the `Money` type for rental rates, replacement costs, payment
//! amounts, and revenue totals.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                 │
//! │                                                             │
//! │  In binary floating point:                                  │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!               │
//! │                                                             │
//! │  The store encodes money as DECIMAL(p,2); a faithful        │
//! │  round-trip requires an exact decimal on this side too:     │
//! │    "4.99" -> Money -> "4.99"   (scale preserved)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sakila_core::money::Money;
//!
//! let rate = Money::parse("2.99").unwrap();
//! assert_eq!(rate.to_string(), "2.99");
//!
//! // Negative amounts are rejected at construction
//! assert!(Money::parse("-1.00").is_err());
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MoneyError;

/// Rental rate charged when the film lookup for an inventory item yields
/// nothing. Matches the most common rate tier in the dataset.
pub const DEFAULT_RENTAL_RATE: Money = Money(dec!(4.99));

// =============================================================================
// Money Type
// =============================================================================

/// A non-negative exact-decimal monetary value.
///
/// Invariants, enforced at every constructor:
/// - never negative (rates and costs have no sign)
/// - round-trips exactly through its string-decimal encoding, including
///   trailing zeros (`"0.00"` stays `"0.00"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Parses a textual decimal amount such as `"4.99"`.
    ///
    /// ## Errors
    /// * [`MoneyError::Unparsable`] - input is not a decimal number
    /// * [`MoneyError::Negative`] - input is a negative amount
    pub fn parse(text: &str) -> Result<Self, MoneyError> {
        let value = Decimal::from_str(text.trim())
            .map_err(|_| MoneyError::Unparsable(text.to_string()))?;
        Self::from_decimal(value)
    }

    /// Wraps an already-decoded decimal, rejecting negative amounts.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() {
            if value.is_zero() {
                // "-0.00" carries no information; normalize the sign
                return Ok(Money(value.abs()));
            }
            return Err(MoneyError::Negative(value));
        }
        Ok(Money(value))
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying exact decimal (for binding into statements).
    #[inline]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the plain decimal form (`4.99`), preserving the stored scale.
/// Currency symbols are the presentation shell's concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

/// Addition of two Money values (revenue totals).
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for text in ["4.99", "0.00", "19999.99", "2.99", "0.99"] {
            let money = Money::parse(text).unwrap();
            assert_eq!(money.to_string(), text, "round-trip failed for {text}");
        }
    }

    #[test]
    fn scale_is_preserved() {
        // "5" and "5.00" are numerically equal but encode differently;
        // each keeps the form it arrived in
        assert_eq!(Money::parse("5").unwrap().to_string(), "5");
        assert_eq!(Money::parse("5.00").unwrap().to_string(), "5.00");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            Money::parse("four99"),
            Err(MoneyError::Unparsable("four99".to_string()))
        );
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            Money::parse("-4.99"),
            Err(MoneyError::Negative(_))
        ));
    }

    #[test]
    fn negative_zero_normalizes() {
        let money = Money::parse("-0.00").unwrap();
        assert!(money.is_zero());
        assert_eq!(money.to_string(), "0.00");
    }

    #[test]
    fn from_str_trait_matches_parse() {
        let parsed: Money = "2.99".parse().unwrap();
        assert_eq!(parsed, Money::parse("2.99").unwrap());
    }

    #[test]
    fn addition() {
        let mut total = Money::zero();
        total += Money::parse("2.99").unwrap();
        total += Money::parse("0.01").unwrap();
        assert_eq!(total.to_string(), "3.00");
    }

    #[test]
    fn default_rental_rate_is_four_ninety_nine() {
        assert_eq!(DEFAULT_RENTAL_RATE.to_string(), "4.99");
    }
}
