//! # Repository Module
//!
//! One repository per aggregate, each holding a [`Database`] handle and
//! resolving the pool per call, so connection loss is observed at operation
//! time and never cached away.
//!
//! ```text
//! Shell action
//!      │  db.rentals().create(inventory_id, customer_id, staff_id)
//!      ▼
//! RentalRepository ── begins a transaction ──► MySQL
//!      │                                        │
//!      ▼                                        ▼
//! typed DbResult ◄── row mapping ◄──────── result rows
//! ```
//!
//! Reads run directly on the pool. Any method that issues more than one
//! statement wraps the whole sequence in a transaction: the sequence commits
//! or rolls back as a unit, and the transaction's connection is pinned so no
//! concurrent caller's statement can interleave with it. Every public method
//! runs under the connection's operation budget.
//!
//! ## Available Repositories
//!
//! - [`film::FilmRepository`] - catalog reads and film detail
//! - [`customer::CustomerRepository`] - customer CRUD and city lookup
//! - [`staff::StaffRepository`] - staff CRUD
//! - [`rental::RentalRepository`] - rental lifecycle (create, return, feeds)
//! - [`dashboard::DashboardRepository`] - consolidated dashboard snapshot
//!
//! [`Database`]: crate::pool::Database

pub mod customer;
pub mod dashboard;
pub mod film;
pub mod rental;
pub mod staff;
