//! # sakila-db: Data Access Layer for the Sakila Admin Client
//!
//! This crate owns the connection to the MySQL store and every statement
//! sent over it. The presentation shell above it only ever sees
//! [`sakila_core`] entities and typed [`DbError`]s.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Shell action (list films, rent out a copy, ...)                 │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                  sakila-db (THIS CRATE)                    │  │
//! │  │                                                            │  │
//! │  │   ┌──────────┐   ┌──────────────┐   ┌──────────────────┐   │  │
//! │  │   │ Database │   │ Repositories │   │ query.rs/row.rs  │   │  │
//! │  │   │ (pool.rs)│◄──│ film/customer│──►│ SQL assembly +   │   │  │
//! │  │   │ MySqlPool│   │ staff/rental │   │ row mapping      │   │  │
//! │  │   └──────────┘   │ dashboard    │   └──────────────────┘   │  │
//! │  │                  └──────────────┘                          │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  MySQL server exposing the sakila schema                         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! The store connection is the one shared resource. A bounded [`sqlx`] pool
//! replaces the single shared connection: plain reads run concurrently on
//! separate pooled connections, and every multi-statement write runs inside
//! a transaction, which pins one physical connection for the whole sequence
//! so no other caller's statement can interleave with it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sakila_db::{ConnectSettings, Database};
//!
//! let db = Database::new();
//! db.connect(&ConnectSettings::new().host("db.local")).await?;
//!
//! let films = db.films().list(&Default::default()).await?;
//! let stats = db.dashboard().stats().await?;
//!
//! db.disconnect().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod query;
pub mod repository;

mod row;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{ConnectSettings, Database};
pub use query::{CustomerFilter, FilmFilter};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::dashboard::DashboardRepository;
pub use repository::film::FilmRepository;
pub use repository::rental::RentalRepository;
pub use repository::staff::StaffRepository;
