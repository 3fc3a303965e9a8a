//! # sakila-core: Pure Domain Model for the Sakila Admin Client
//!
//! Every type here is a plain value record built fresh from a query result
//! and discarded once the caller consumes it. Nothing in this crate performs
//! I/O, holds a cache, or knows how the store is reached.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation shell (out of scope)                          │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  sakila-db (repositories, pool, queries)                    │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ★ sakila-core (THIS CRATE) ★                               │
//! │    types • money • validation • errors                      │
//! │    NO I/O • NO DATABASE • PURE FUNCTIONS                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Film, Customer, Rental, ...)
//! - [`money`] - Exact-decimal [`Money`] type (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation against the store's column widths

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{MoneyError, ValidationError};
pub use money::{Money, DEFAULT_RENTAL_RATE};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store id assumed when a row does not carry one.
///
/// The sakila dataset ships with store 1 as the primary location; the source
/// schema requires the column, so hitting this default indicates a query bug
/// rather than valid data.
pub const DEFAULT_STORE_ID: i64 = 1;

/// Language id assumed when a film row does not carry one.
pub const DEFAULT_LANGUAGE_ID: i64 = 1;

/// Rental period in days assumed when a film row does not carry one.
/// Matches the schema default for `film.rental_duration`.
pub const DEFAULT_RENTAL_DURATION_DAYS: i64 = 3;

// Column widths of the sakila schema, enforced by [`validation`] before any
// statement is issued so a write never bounces off the store's own limits.

/// `first_name` / `last_name` columns are VARCHAR(45).
pub const MAX_NAME_LEN: usize = 45;

/// `email` columns are VARCHAR(50).
pub const MAX_EMAIL_LEN: usize = 50;

/// `staff.username` is VARCHAR(16).
pub const MAX_USERNAME_LEN: usize = 16;

/// `address.address` is VARCHAR(50).
pub const MAX_ADDRESS_LEN: usize = 50;

/// `address.district` is VARCHAR(20).
pub const MAX_DISTRICT_LEN: usize = 20;

/// `address.postal_code` is VARCHAR(10).
pub const MAX_POSTAL_CODE_LEN: usize = 10;

/// `address.phone` is VARCHAR(20).
pub const MAX_PHONE_LEN: usize = 20;
