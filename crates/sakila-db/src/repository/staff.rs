//! # Staff Repository
//!
//! Staff list/add/update/delete. Staff reference an existing address row,
//! so creation is a single insert; deletion clears dependents first, like
//! customer deletion.

use tracing::debug;

use sakila_core::{NewStaff, Staff, StaffUpdate};

use crate::error::{DbError, DbResult};
use crate::pool::{with_timeout, Database};
use crate::row;

/// Repository for staff operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    db: Database,
}

impl StaffRepository {
    pub(crate) fn new(db: Database) -> Self {
        StaffRepository { db }
    }

    /// Lists all staff with their joined address fields, last-name order.
    pub async fn list(&self) -> DbResult<Vec<Staff>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let rows = sqlx::query(
                "SELECT s.staff_id, s.first_name, s.last_name, s.email, s.store_id, \
                 s.active, s.username, s.address_id, \
                 a.address, a.district, ci.name AS city, a.phone \
                 FROM staff s \
                 JOIN address a ON s.address_id = a.address_id \
                 JOIN city ci ON a.city_id = ci.city_id \
                 ORDER BY s.last_name, s.first_name",
            )
            .fetch_all(&pool)
            .await?;
            Ok(rows.iter().map(row::staff_from_row).collect())
        })
        .await
    }

    /// Creates a staff member referencing an existing address row. Returns
    /// the new staff id.
    ///
    /// ## Errors
    /// * [`DbError::InvalidInput`] - a field fails validation; nothing is sent
    /// * [`DbError::ConstraintViolation`] - `address_id` or `store_id`
    ///   references a missing row
    pub async fn add(&self, staff: &NewStaff) -> DbResult<i64> {
        staff.validate()?;
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            debug!(username = %staff.username, "adding staff member");
            let result = sqlx::query(
                "INSERT INTO staff \
                 (first_name, last_name, email, store_id, active, username, address_id) \
                 VALUES (?, ?, ?, ?, 1, ?, ?)",
            )
            .bind(&staff.first_name)
            .bind(&staff.last_name)
            .bind(staff.email.as_deref())
            .bind(staff.store_id)
            .bind(&staff.username)
            .bind(staff.address_id)
            .execute(&pool)
            .await?;

            let staff_id = result.last_insert_id();
            if staff_id == 0 {
                return Err(DbError::insert_failed("staff"));
            }
            Ok(staff_id as i64)
        })
        .await
    }

    /// Updates a staff member's editable fields, keyed by id.
    ///
    /// ## Errors
    /// * [`DbError::NotFound`] - no row matched the id
    pub async fn update(&self, id: i64, update: &StaffUpdate) -> DbResult<()> {
        update.validate()?;
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let result = sqlx::query(
                "UPDATE staff \
                 SET first_name = ?, last_name = ?, email = ?, store_id = ?, \
                 username = ?, active = ? \
                 WHERE staff_id = ?",
            )
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(update.email.as_deref())
            .bind(update.store_id)
            .bind(&update.username)
            .bind(update.active)
            .bind(id)
            .execute(&pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("staff", id));
            }
            Ok(())
        })
        .await
    }

    /// Deletes a staff member and every row that references it: payments,
    /// then rentals, then the staff row, all in one transaction.
    ///
    /// ## Errors
    /// * [`DbError::NotFound`] - no staff member carries this id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            debug!(id, "deleting staff member with dependents");
            let mut tx = pool.begin().await?;

            sqlx::query("DELETE FROM payment WHERE staff_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM rental WHERE staff_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            let result = sqlx::query("DELETE FROM staff WHERE staff_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("staff", id));
            }

            tx.commit().await?;
            Ok(())
        })
        .await
    }
}
