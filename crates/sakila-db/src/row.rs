//! # Row Mapping
//!
//! Converts raw result rows into domain entities. Mapping is total: a
//! malformed cell never fails the whole row, it falls back through one of
//! the policy helpers below, and every lossy fallback is logged so a schema
//! or query bug is visible instead of silent.
//!
//! Defaulting policy (see also the policy-helper tests):
//! - integers fall back to a documented sentinel (0 for identities, 1 for
//!   store/language references, 3 for rental duration); the schema makes
//!   identity columns NOT NULL, so a logged 0 identity means the query is
//!   wrong, not the data;
//! - money falls back to zero, and negative amounts are rejected to zero;
//! - a rental date that cannot be decoded falls back to "now";
//! - a return date that cannot be decoded falls back to absent, which
//!   callers see as a still-open rental;
//! - nullable display columns stay `Option`; absent is never conflated
//!   with an empty string.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use tracing::warn;

use sakila_core::{
    Actor, Category, City, Customer, Film, InventoryItem, Money, Rental, Staff, StoreInventory,
    TopFilm, DEFAULT_LANGUAGE_ID, DEFAULT_RENTAL_DURATION_DAYS, DEFAULT_STORE_ID,
};

// =============================================================================
// Policy Helpers
// =============================================================================
// Pure, so the fallback rules are testable without a live row.

/// Integer column with a documented sentinel default.
pub(crate) fn int_or(value: Option<i64>, default: i64, column: &str) -> i64 {
    match value {
        Some(v) => v,
        None => {
            warn!(column, default, "integer column missing or undecodable");
            default
        }
    }
}

/// Required text column; the schema never NULLs these, so an absent value
/// is logged and mapped to empty.
pub(crate) fn text_or_empty(value: Option<String>, column: &str) -> String {
    match value {
        Some(v) => v,
        None => {
            warn!(column, "text column missing or undecodable");
            String::new()
        }
    }
}

/// Money column; absent, undecodable, or negative decodes to zero.
pub(crate) fn money_or_zero(value: Option<Decimal>, column: &str) -> Money {
    let Some(decimal) = value else {
        warn!(column, "money column missing or undecodable; using 0");
        return Money::zero();
    };
    match Money::from_decimal(decimal) {
        Ok(money) => money,
        Err(err) => {
            warn!(column, %err, "rejected money value; using 0");
            Money::zero()
        }
    }
}

/// Rental timestamp; an undecodable value falls back to the current time,
/// which keeps the row visible in "recent" feeds rather than dropping it.
pub(crate) fn rental_date_or_now(value: Option<DateTime<Utc>>, rental_id: i64) -> DateTime<Utc> {
    match value {
        Some(v) => v,
        None => {
            warn!(rental_id, "rental_date undecodable; substituting now");
            Utc::now()
        }
    }
}

// =============================================================================
// Row Accessors
// =============================================================================

fn opt_i64(row: &MySqlRow, column: &str) -> Option<i64> {
    row.try_get::<Option<i64>, _>(column).ok().flatten()
}

fn opt_text(row: &MySqlRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

fn opt_decimal(row: &MySqlRow, column: &str) -> Option<Decimal> {
    row.try_get::<Option<Decimal>, _>(column).ok().flatten()
}

fn opt_datetime(row: &MySqlRow, column: &str) -> Option<DateTime<Utc>> {
    row.try_get::<Option<DateTime<Utc>>, _>(column).ok().flatten()
}

fn id(row: &MySqlRow, column: &str) -> i64 {
    int_or(opt_i64(row, column), 0, column)
}

fn text(row: &MySqlRow, column: &str) -> String {
    text_or_empty(opt_text(row, column), column)
}

fn flag(row: &MySqlRow, column: &str) -> bool {
    // TINYINT(1) columns; the schema defaults `active` to 1
    int_or(opt_i64(row, column), 1, column) != 0
}

// =============================================================================
// Entity Mappers
// =============================================================================

pub(crate) fn film_from_row(row: &MySqlRow) -> Film {
    Film {
        id: id(row, "film_id"),
        title: text(row, "title"),
        description: opt_text(row, "description"),
        release_year: opt_i64(row, "release_year"),
        language_id: int_or(opt_i64(row, "language_id"), DEFAULT_LANGUAGE_ID, "language_id"),
        rental_duration: int_or(
            opt_i64(row, "rental_duration"),
            DEFAULT_RENTAL_DURATION_DAYS,
            "rental_duration",
        ),
        rental_rate: money_or_zero(opt_decimal(row, "rental_rate"), "rental_rate"),
        length: opt_i64(row, "length"),
        replacement_cost: money_or_zero(
            opt_decimal(row, "replacement_cost"),
            "replacement_cost",
        ),
        rating: opt_text(row, "rating"),
        special_features: opt_text(row, "special_features"),
    }
}

pub(crate) fn actor_from_row(row: &MySqlRow) -> Actor {
    Actor {
        id: id(row, "actor_id"),
        first_name: text(row, "first_name"),
        last_name: text(row, "last_name"),
    }
}

pub(crate) fn category_from_row(row: &MySqlRow) -> Category {
    Category {
        id: id(row, "category_id"),
        name: text(row, "name"),
    }
}

pub(crate) fn city_from_row(row: &MySqlRow) -> City {
    City {
        id: id(row, "city_id"),
        name: text(row, "city"),
    }
}

pub(crate) fn customer_from_row(row: &MySqlRow) -> Customer {
    Customer {
        id: id(row, "customer_id"),
        store_id: int_or(opt_i64(row, "store_id"), DEFAULT_STORE_ID, "store_id"),
        first_name: text(row, "first_name"),
        last_name: text(row, "last_name"),
        email: opt_text(row, "email"),
        address_id: id(row, "address_id"),
        active: flag(row, "active"),
        address: opt_text(row, "address"),
        district: opt_text(row, "district"),
        city: opt_text(row, "city"),
        postal_code: opt_text(row, "postal_code"),
        phone: opt_text(row, "phone"),
    }
}

pub(crate) fn staff_from_row(row: &MySqlRow) -> Staff {
    Staff {
        id: id(row, "staff_id"),
        first_name: text(row, "first_name"),
        last_name: text(row, "last_name"),
        email: opt_text(row, "email"),
        store_id: int_or(opt_i64(row, "store_id"), DEFAULT_STORE_ID, "store_id"),
        active: flag(row, "active"),
        username: text(row, "username"),
        address_id: id(row, "address_id"),
        address: opt_text(row, "address"),
        district: opt_text(row, "district"),
        city: opt_text(row, "city"),
        phone: opt_text(row, "phone"),
    }
}

pub(crate) fn rental_from_row(row: &MySqlRow) -> Rental {
    let rental_id = id(row, "rental_id");
    Rental {
        id: rental_id,
        rental_date: rental_date_or_now(opt_datetime(row, "rental_date"), rental_id),
        // NULL and undecodable both read as "still out"
        return_date: opt_datetime(row, "returned_date"),
        inventory_id: id(row, "inventory_id"),
        customer_id: id(row, "customer_id"),
        staff_id: id(row, "staff_id"),
        customer_name: opt_text(row, "customer_name"),
        film_title: opt_text(row, "film_title"),
        staff_name: opt_text(row, "staff_name"),
    }
}

pub(crate) fn inventory_item_from_row(row: &MySqlRow) -> InventoryItem {
    InventoryItem {
        id: id(row, "inventory_id"),
        store_id: id(row, "store_id"),
        film_title: text(row, "title"),
        available: int_or(opt_i64(row, "available"), 0, "available") != 0,
    }
}

pub(crate) fn store_inventory_from_row(row: &MySqlRow) -> StoreInventory {
    StoreInventory {
        store_id: id(row, "store_id"),
        total_count: int_or(opt_i64(row, "total"), 0, "total"),
        available_count: int_or(opt_i64(row, "available"), 0, "available"),
    }
}

pub(crate) fn top_film_from_row(row: &MySqlRow) -> TopFilm {
    TopFilm {
        id: id(row, "film_id"),
        title: text(row, "title"),
        rental_count: int_or(opt_i64(row, "rental_count"), 0, "rental_count"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn int_fallbacks_use_documented_sentinels() {
        assert_eq!(int_or(Some(12), 0, "film_id"), 12);
        assert_eq!(int_or(None, 0, "film_id"), 0);
        assert_eq!(int_or(None, 1, "store_id"), 1);
        assert_eq!(int_or(None, 3, "rental_duration"), 3);
    }

    #[test]
    fn money_fallback_is_zero() {
        let parsed = Decimal::from_str("2.99").unwrap();
        assert_eq!(
            money_or_zero(Some(parsed), "rental_rate"),
            Money::parse("2.99").unwrap()
        );
        assert_eq!(money_or_zero(None, "rental_rate"), Money::zero());

        let negative = Decimal::from_str("-1.00").unwrap();
        assert_eq!(money_or_zero(Some(negative), "amount"), Money::zero());
    }

    #[test]
    fn missing_rental_date_becomes_now() {
        let before = Utc::now();
        let fallback = rental_date_or_now(None, 7);
        assert!(fallback >= before);

        let known = Utc::now();
        assert_eq!(rental_date_or_now(Some(known), 7), known);
    }

    #[test]
    fn missing_text_becomes_empty_not_none() {
        assert_eq!(text_or_empty(Some("MARY".to_string()), "first_name"), "MARY");
        assert_eq!(text_or_empty(None, "first_name"), "");
    }
}
