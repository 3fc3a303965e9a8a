//! # Customer Repository
//!
//! Customer list/add/update/delete plus the city lookup that feeds the
//! address form.
//!
//! ## Write Sequencing
//! Creating a customer is a two-insert sequence (the address row must exist
//! before the customer can reference it) and deletion is a three-delete
//! sequence (payments and rentals reference the customer). Both run inside
//! a transaction, so a failure partway leaves nothing behind.

use tracing::debug;

use sakila_core::{City, Customer, CustomerUpdate, NewCustomer};

use crate::error::{DbError, DbResult};
use crate::pool::{with_timeout, Database};
use crate::query::{CustomerFilter, CITY_ROW_CAP};
use crate::row;

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: Database,
}

impl CustomerRepository {
    pub(crate) fn new(db: Database) -> Self {
        CustomerRepository { db }
    }

    /// Lists customers with their joined address fields, last-name order,
    /// capped at 500 rows.
    pub async fn list(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let (sql, binds) = filter.build();
            debug!(binds = binds.len(), "listing customers");

            let mut query = sqlx::query(&sql);
            for bind in &binds {
                query = query.bind(bind.as_str());
            }

            let rows = query.fetch_all(&pool).await?;
            Ok(rows.iter().map(row::customer_from_row).collect())
        })
        .await
    }

    /// Creates a customer and the address row it references.
    ///
    /// Transactional sequence: insert `address`, read back its generated
    /// identity, insert `customer` referencing it. Returns the new
    /// customer id.
    ///
    /// ## Errors
    /// * [`DbError::InvalidInput`] - a field fails validation; nothing is sent
    /// * [`DbError::InsertFailed`] - the store produced no generated identity
    pub async fn add(&self, customer: &NewCustomer) -> DbResult<i64> {
        customer.validate()?;
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            debug!(name = %customer.first_name, "adding customer");
            let mut tx = pool.begin().await?;

            let address_result = sqlx::query(
                "INSERT INTO address \
                 (address, district, city_id, postal_code, phone, location) \
                 VALUES (?, ?, ?, ?, ?, ST_GeomFromText('POINT(0 0)'))",
            )
            .bind(&customer.address)
            .bind(&customer.district)
            .bind(customer.city_id)
            .bind(&customer.postal_code)
            .bind(&customer.phone)
            .execute(&mut *tx)
            .await?;

            let address_id = address_result.last_insert_id();
            if address_id == 0 {
                return Err(DbError::insert_failed("address"));
            }

            let customer_result = sqlx::query(
                "INSERT INTO customer \
                 (store_id, first_name, last_name, email, address_id, active, create_date) \
                 VALUES (?, ?, ?, ?, ?, 1, NOW())",
            )
            .bind(customer.store_id)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(customer.email.as_deref())
            .bind(address_id)
            .execute(&mut *tx)
            .await?;

            let customer_id = customer_result.last_insert_id();
            if customer_id == 0 {
                return Err(DbError::insert_failed("customer"));
            }

            tx.commit().await?;
            Ok(customer_id as i64)
        })
        .await
    }

    /// Updates a customer's editable fields, keyed by id.
    ///
    /// ## Errors
    /// * [`DbError::NotFound`] - no row matched the id (zero rows affected
    ///   is not silent success)
    pub async fn update(&self, id: i64, update: &CustomerUpdate) -> DbResult<()> {
        update.validate()?;
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let result = sqlx::query(
                "UPDATE customer \
                 SET first_name = ?, last_name = ?, email = ?, store_id = ?, active = ? \
                 WHERE customer_id = ?",
            )
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(update.email.as_deref())
            .bind(update.store_id)
            .bind(update.active)
            .bind(id)
            .execute(&pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("customer", id));
            }
            Ok(())
        })
        .await
    }

    /// Deletes a customer and every row that references it.
    ///
    /// The store enforces referential order, so dependents go first:
    /// payments, then rentals, then the customer row itself, all in one
    /// transaction. No orphans remain either way.
    ///
    /// ## Errors
    /// * [`DbError::NotFound`] - no customer carries this id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            debug!(id, "deleting customer with dependents");
            let mut tx = pool.begin().await?;

            sqlx::query("DELETE FROM payment WHERE customer_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM rental WHERE customer_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            let result = sqlx::query("DELETE FROM customer WHERE customer_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("customer", id));
            }

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    /// City lookup for the address form, name order, capped.
    pub async fn cities(&self) -> DbResult<Vec<City>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let sql =
                format!("SELECT city_id, city FROM city ORDER BY city LIMIT {CITY_ROW_CAP}");
            let rows = sqlx::query(&sql).fetch_all(&pool).await?;
            Ok(rows.iter().map(row::city_from_row).collect())
        })
        .await
    }
}
