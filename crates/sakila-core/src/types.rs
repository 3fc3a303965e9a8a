//! # Domain Types
//!
//! Entity records for the media-rental dataset. Every struct here is a plain
//! value: relationships are foreign-key references resolved by query, never
//! an in-memory object graph, and join-only display fields are `Option`s
//! that are populated solely by the statements that select them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Film
// =============================================================================

/// A film title in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
    pub language_id: i64,
    /// Rental period in days; overdue checks compare against this.
    pub rental_duration: i64,
    pub rental_rate: Money,
    /// Running time in minutes.
    pub length: Option<i64>,
    pub replacement_cost: Money,
    /// MPAA rating code (`G`, `PG`, `PG-13`, `R`, `NC-17`); absent means unrated.
    pub rating: Option<String>,
    pub special_features: Option<String>,
}

impl Film {
    /// Rating for display; unrated films show as "NR".
    pub fn formatted_rating(&self) -> &str {
        self.rating.as_deref().unwrap_or("NR")
    }

    /// Running time as "1h 26m" / "52m", or "N/A" when unknown.
    pub fn formatted_length(&self) -> String {
        match self.length {
            None => "N/A".to_string(),
            Some(length) => {
                let hours = length / 60;
                let minutes = length % 60;
                if hours > 0 {
                    format!("{hours}h {minutes}m")
                } else {
                    format!("{minutes}m")
                }
            }
        }
    }
}

/// A film with its cast, categories, and per-store availability resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmDetail {
    pub film: Film,
    pub actors: Vec<Actor>,
    pub categories: Vec<Category>,
    pub inventory_by_store: Vec<StoreInventory>,
}

/// Copy counts for one film at one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInventory {
    pub store_id: i64,
    pub total_count: i64,
    pub available_count: i64,
}

/// One physical copy of a film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub store_id: i64,
    pub film_title: String,
    /// True iff no open rental references this copy.
    pub available: bool,
}

// =============================================================================
// Actor & Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Actor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Address-form lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Customer
// =============================================================================

/// A rental customer.
///
/// The address/district/city/postal/phone fields are denormalized display
/// values copied via join at read time; they are never authoritative and
/// never written back through this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub store_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address_id: i64,
    pub active: bool,

    // Joined address fields
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input record for customer creation. The address fields become a new
/// `address` row inserted ahead of the customer itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub store_id: i64,
    pub address: String,
    pub district: String,
    pub city_id: i64,
    pub postal_code: String,
    pub phone: String,
}

impl NewCustomer {
    /// Checks every field against the store's column widths before any
    /// statement is issued.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_name("first_name", &self.first_name)?;
        validation::validate_name("last_name", &self.last_name)?;
        validation::validate_email(self.email.as_deref())?;
        validation::validate_id("store_id", self.store_id)?;
        validation::validate_id("city_id", self.city_id)?;
        validation::validate_address(&self.address, &self.district, &self.postal_code, &self.phone)
    }
}

/// Field set for a customer update; applied unconditionally, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub store_id: i64,
    pub active: bool,
}

impl CustomerUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_name("first_name", &self.first_name)?;
        validation::validate_name("last_name", &self.last_name)?;
        validation::validate_email(self.email.as_deref())?;
        validation::validate_id("store_id", self.store_id)
    }
}

// =============================================================================
// Staff
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub store_id: i64,
    pub active: bool,
    pub username: String,
    pub address_id: i64,

    // Joined address fields
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input record for staff creation. Staff reference an existing address row;
/// unlike customers, no address is created on their behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub store_id: i64,
    pub username: String,
    pub address_id: i64,
}

impl NewStaff {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_name("first_name", &self.first_name)?;
        validation::validate_name("last_name", &self.last_name)?;
        validation::validate_email(self.email.as_deref())?;
        validation::validate_username(&self.username)?;
        validation::validate_id("store_id", self.store_id)?;
        validation::validate_id("address_id", self.address_id)
    }
}

/// Field set for a staff update; applied unconditionally, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub store_id: i64,
    pub username: String,
    pub active: bool,
}

impl StaffUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_name("first_name", &self.first_name)?;
        validation::validate_name("last_name", &self.last_name)?;
        validation::validate_email(self.email.as_deref())?;
        validation::validate_username(&self.username)?;
        validation::validate_id("store_id", self.store_id)
    }
}

// =============================================================================
// Rental
// =============================================================================

/// A rental row, optionally enriched with display names via join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: i64,
    pub rental_date: DateTime<Utc>,
    /// Absent while the item is still out.
    pub return_date: Option<DateTime<Utc>>,
    pub inventory_id: i64,
    pub customer_id: i64,
    pub staff_id: i64,

    // Joined display fields
    pub customer_name: Option<String>,
    pub film_title: Option<String>,
    pub staff_name: Option<String>,
}

impl Rental {
    /// A rental is active exactly while its return date is absent.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// One entry of the top-rented list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopFilm {
    pub id: i64,
    pub title: String,
    pub rental_count: i64,
}

/// Ephemeral aggregate snapshot, rebuilt in full on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_films: i64,
    pub total_customers: i64,
    pub total_staff: i64,
    pub active_rentals: i64,
    pub overdue_rentals: i64,
    pub total_revenue: Money,
    pub top_films: Vec<TopFilm>,
    pub recent_rentals: Vec<Rental>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_rental(returned: bool) -> Rental {
        Rental {
            id: 1,
            rental_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            return_date: returned
                .then(|| Utc.with_ymd_and_hms(2024, 5, 4, 9, 30, 0).unwrap()),
            inventory_id: 7,
            customer_id: 42,
            staff_id: 2,
            customer_name: Some("MARY SMITH".to_string()),
            film_title: Some("ACADEMY DINOSAUR".to_string()),
            staff_name: Some("Mike Hillyer".to_string()),
        }
    }

    #[test]
    fn rental_is_active_iff_return_date_absent() {
        assert!(sample_rental(false).is_active());
        assert!(!sample_rental(true).is_active());
    }

    #[test]
    fn film_formatted_length() {
        let mut film = Film {
            id: 1,
            title: "ACADEMY DINOSAUR".to_string(),
            description: None,
            release_year: Some(2006),
            language_id: 1,
            rental_duration: 6,
            rental_rate: Money::parse("0.99").unwrap(),
            length: Some(86),
            replacement_cost: Money::parse("20.99").unwrap(),
            rating: None,
            special_features: None,
        };
        assert_eq!(film.formatted_length(), "1h 26m");
        assert_eq!(film.formatted_rating(), "NR");

        film.length = Some(52);
        film.rating = Some("PG".to_string());
        assert_eq!(film.formatted_length(), "52m");
        assert_eq!(film.formatted_rating(), "PG");

        film.length = None;
        assert_eq!(film.formatted_length(), "N/A");
    }

    #[test]
    fn full_names_join_with_space() {
        let actor = Actor {
            id: 1,
            first_name: "PENELOPE".to_string(),
            last_name: "GUINESS".to_string(),
        };
        assert_eq!(actor.full_name(), "PENELOPE GUINESS");
    }

    #[test]
    fn new_customer_validation_catches_bad_input() {
        let mut input = NewCustomer {
            first_name: "MARY".to_string(),
            last_name: "SMITH".to_string(),
            email: Some("mary.smith@sakilacustomer.org".to_string()),
            store_id: 1,
            address: "1913 Hanoi Way".to_string(),
            district: "Nagasaki".to_string(),
            city_id: 463,
            postal_code: "35200".to_string(),
            phone: "28303384290".to_string(),
        };
        assert!(input.validate().is_ok());

        input.first_name.clear();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required { field: "first_name" })
        );
    }

    #[test]
    fn staff_update_validation_checks_username() {
        let update = StaffUpdate {
            first_name: "Jon".to_string(),
            last_name: "Stephens".to_string(),
            email: None,
            store_id: 2,
            username: "a-username-way-too-long".to_string(),
            active: true,
        };
        assert_eq!(
            update.validate(),
            Err(ValidationError::TooLong {
                field: "username",
                max: crate::MAX_USERNAME_LEN,
            })
        );
    }
}
