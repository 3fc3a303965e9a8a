//! # Rental Repository
//!
//! The rental lifecycle: the open-rental and recent feeds, rental creation,
//! and return processing.
//!
//! ## Rental Creation Sequence
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    SINGLE TRANSACTION                      │
//! │                                                            │
//! │  1. INSERT INTO rental (rental_date, ...) VALUES (NOW()..) │
//! │  2. generated rental_id ← driver (zero ⇒ InsertFailed)     │
//! │  3. SELECT rental_rate through inventory                   │
//! │     (no row ⇒ DEFAULT_RENTAL_RATE)                         │
//! │  4. INSERT INTO payment (.., rental_id, amount, NOW())     │
//! │                                                            │
//! └────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! COMMIT ← rental and payment land together or not at all
//! ```

use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::debug;

use sakila_core::{Money, Rental, DEFAULT_RENTAL_RATE};

use crate::error::{DbError, DbResult};
use crate::pool::{with_timeout, Database};
use crate::query::LIST_ROW_CAP;
use crate::row;

/// Shared select for rental feeds: the raw rental columns plus the three
/// join-only display names.
const RENTAL_SELECT: &str =
    "SELECT r.rental_id, r.rental_date, r.returned_date, r.inventory_id, \
     r.customer_id, r.staff_id, \
     CONCAT(c.first_name, ' ', c.last_name) AS customer_name, \
     f.title AS film_title, \
     CONCAT(s.first_name, ' ', s.last_name) AS staff_name \
     FROM rental r \
     JOIN customer c ON r.customer_id = c.customer_id \
     JOIN inventory i ON r.inventory_id = i.inventory_id \
     JOIN film f ON i.film_id = f.film_id \
     JOIN staff s ON r.staff_id = s.staff_id";

/// Repository for rental operations.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    db: Database,
}

impl RentalRepository {
    pub(crate) fn new(db: Database) -> Self {
        RentalRepository { db }
    }

    /// Open rentals (no return date), newest first, capped at 500 rows.
    pub async fn active(&self) -> DbResult<Vec<Rental>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let sql = format!(
                "{RENTAL_SELECT} WHERE r.returned_date IS NULL \
                 ORDER BY r.rental_date DESC LIMIT {LIST_ROW_CAP}"
            );
            let rows = sqlx::query(&sql).fetch_all(&pool).await?;
            Ok(rows.iter().map(row::rental_from_row).collect())
        })
        .await
    }

    /// Most recent rentals regardless of state, newest first.
    pub async fn recent(&self, feed_limit: i64) -> DbResult<Vec<Rental>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move { fetch_recent(&pool, feed_limit).await }).await
    }

    /// Rents an inventory item out: inserts the rental and its payment row
    /// in one transaction. Returns the new rental id.
    ///
    /// The payment amount is the film's rental rate, looked up through the
    /// inventory item; when the lookup yields nothing the default rate
    /// applies.
    ///
    /// ## Errors
    /// * [`DbError::InsertFailed`] - the store produced no rental identity;
    ///   the transaction rolls back, no orphan rental remains
    /// * [`DbError::ConstraintViolation`] - inventory/customer/staff id
    ///   references a missing row
    pub async fn create(
        &self,
        inventory_id: i64,
        customer_id: i64,
        staff_id: i64,
    ) -> DbResult<i64> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            debug!(inventory_id, customer_id, staff_id, "creating rental");
            let mut tx = pool.begin().await?;

            let inserted = sqlx::query(
                "INSERT INTO rental (rental_date, inventory_id, customer_id, staff_id) \
                 VALUES (NOW(), ?, ?, ?)",
            )
            .bind(inventory_id)
            .bind(customer_id)
            .bind(staff_id)
            .execute(&mut *tx)
            .await?;

            let rental_id = inserted.last_insert_id();
            if rental_id == 0 {
                return Err(DbError::insert_failed("rental"));
            }

            let rate: Option<Decimal> = sqlx::query_scalar(
                "SELECT f.rental_rate FROM film f \
                 JOIN inventory i ON f.film_id = i.film_id \
                 WHERE i.inventory_id = ?",
            )
            .bind(inventory_id)
            .fetch_optional(&mut *tx)
            .await?;

            let amount = rate
                .and_then(|value| Money::from_decimal(value).ok())
                .unwrap_or(DEFAULT_RENTAL_RATE);

            sqlx::query(
                "INSERT INTO payment \
                 (customer_id, staff_id, rental_id, amount, payment_date) \
                 VALUES (?, ?, ?, ?, NOW())",
            )
            .bind(customer_id)
            .bind(staff_id)
            .bind(rental_id)
            .bind(amount.as_decimal())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            debug!(rental_id, %amount, "rental created");
            Ok(rental_id as i64)
        })
        .await
    }

    /// Closes an open rental by stamping its return date with the store's
    /// clock.
    ///
    /// ## Errors
    /// * [`DbError::NotFound`] - no rental carries this id (zero rows
    ///   affected is surfaced, never swallowed)
    pub async fn process_return(&self, rental_id: i64) -> DbResult<()> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let result =
                sqlx::query("UPDATE rental SET returned_date = NOW() WHERE rental_id = ?")
                    .bind(rental_id)
                    .execute(&pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("rental", rental_id));
            }
            debug!(rental_id, "return processed");
            Ok(())
        })
        .await
    }
}

/// Recent-rentals read, shared with the dashboard snapshot.
pub(crate) async fn fetch_recent(pool: &MySqlPool, limit: i64) -> DbResult<Vec<Rental>> {
    let sql = format!("{RENTAL_SELECT} ORDER BY r.rental_date DESC LIMIT ?");
    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    Ok(rows.iter().map(row::rental_from_row).collect())
}
