//! # Film Repository
//!
//! Catalog reads: the filtered film list, the full film detail (cast,
//! categories, per-store availability), and the lookups the rental flow
//! needs.

use sqlx::MySqlPool;
use tracing::debug;

use sakila_core::{Actor, Category, Film, FilmDetail, InventoryItem, StoreInventory};

use crate::error::{DbError, DbResult};
use crate::pool::{with_timeout, Database};
use crate::query::FilmFilter;
use crate::row;

/// Repository for film catalog operations.
#[derive(Debug, Clone)]
pub struct FilmRepository {
    db: Database,
}

impl FilmRepository {
    pub(crate) fn new(db: Database) -> Self {
        FilmRepository { db }
    }

    /// Lists films matching the filter, title order, capped at 500 rows.
    pub async fn list(&self, filter: &FilmFilter) -> DbResult<Vec<Film>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let (sql, binds) = filter.build();
            debug!(binds = binds.len(), "listing films");

            let mut query = sqlx::query(&sql);
            for bind in &binds {
                query = query.bind(bind.as_str());
            }

            let rows = query.fetch_all(&pool).await?;
            Ok(rows.iter().map(row::film_from_row).collect())
        })
        .await
    }

    /// Fetches one film with its cast, categories, and per-store copy
    /// counts resolved.
    ///
    /// ## Errors
    /// * [`DbError::NotFound`] - no film carries this id
    pub async fn detail(&self, film_id: i64) -> DbResult<FilmDetail> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let film_row = sqlx::query(
                "SELECT f.film_id, f.title, f.description, f.release_year, \
                 f.language_id, f.rental_duration, f.rental_rate, f.length, \
                 f.replacement_cost, f.rating, f.special_features \
                 FROM film f WHERE f.film_id = ?",
            )
            .bind(film_id)
            .fetch_optional(&pool)
            .await?;

            let film = match film_row {
                Some(found) => row::film_from_row(&found),
                None => return Err(DbError::not_found("film", film_id)),
            };

            // The three child reads are independent; issue them together on
            // separate pooled connections.
            let (actors, categories, inventory_by_store) = tokio::try_join!(
                fetch_actors(&pool, film_id),
                fetch_categories_of(&pool, film_id),
                fetch_store_inventory(&pool, film_id),
            )?;

            Ok(FilmDetail {
                film,
                actors,
                categories,
                inventory_by_store,
            })
        })
        .await
    }

    /// All categories, name order, for the filter dropdown.
    pub async fn categories(&self) -> DbResult<Vec<Category>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let rows =
                sqlx::query("SELECT category_id, name FROM category ORDER BY name")
                    .fetch_all(&pool)
                    .await?;
            Ok(rows.iter().map(row::category_from_row).collect())
        })
        .await
    }

    /// Every copy of a film with its availability flag: a copy is available
    /// iff no open rental references it.
    pub async fn available_inventory(&self, film_id: i64) -> DbResult<Vec<InventoryItem>> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            let rows = sqlx::query(
                "SELECT i.inventory_id, i.store_id, f.title, \
                 CASE WHEN r.rental_id IS NULL THEN 1 ELSE 0 END AS available \
                 FROM inventory i \
                 JOIN film f ON i.film_id = f.film_id \
                 LEFT JOIN rental r ON i.inventory_id = r.inventory_id \
                   AND r.returned_date IS NULL \
                 WHERE i.film_id = ? \
                 ORDER BY i.store_id, i.inventory_id",
            )
            .bind(film_id)
            .fetch_all(&pool)
            .await?;
            Ok(rows.iter().map(row::inventory_item_from_row).collect())
        })
        .await
    }
}

async fn fetch_actors(pool: &MySqlPool, film_id: i64) -> DbResult<Vec<Actor>> {
    let rows = sqlx::query(
        "SELECT a.actor_id, a.first_name, a.last_name \
         FROM actor a \
         JOIN film_actor fa ON a.actor_id = fa.actor_id \
         WHERE fa.film_id = ? \
         ORDER BY a.last_name, a.first_name",
    )
    .bind(film_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row::actor_from_row).collect())
}

async fn fetch_categories_of(pool: &MySqlPool, film_id: i64) -> DbResult<Vec<Category>> {
    let rows = sqlx::query(
        "SELECT c.category_id, c.name \
         FROM category c \
         JOIN film_category fc ON c.category_id = fc.category_id \
         WHERE fc.film_id = ?",
    )
    .bind(film_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row::category_from_row).collect())
}

async fn fetch_store_inventory(pool: &MySqlPool, film_id: i64) -> DbResult<Vec<StoreInventory>> {
    // SUM over an integer CASE comes back as DECIMAL on this wire; cast so
    // the counts decode as integers
    let rows = sqlx::query(
        "SELECT i.store_id, \
         COUNT(*) AS total, \
         CAST(SUM(CASE WHEN r.rental_id IS NULL THEN 1 ELSE 0 END) AS SIGNED) AS available \
         FROM inventory i \
         LEFT JOIN rental r ON i.inventory_id = r.inventory_id \
           AND r.returned_date IS NULL \
         WHERE i.film_id = ? \
         GROUP BY i.store_id",
    )
    .bind(film_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row::store_inventory_from_row).collect())
}
