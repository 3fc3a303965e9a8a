//! # Dashboard Repository
//!
//! Builds the consolidated dashboard snapshot. The snapshot is ephemeral:
//! nothing here is persisted or cached, every call rebuilds it from the
//! store.
//!
//! The eight reads (five counts, the revenue sum, the top-5 list, the
//! recent-activity feed) are independent of one another, so they are issued
//! concurrently on separate pooled connections. A partial snapshot is never
//! returned: the first failure fails the whole request.

use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::debug;

use sakila_core::{DashboardStats, Money, TopFilm};

use crate::error::DbResult;
use crate::pool::{with_timeout, Database};
use crate::repository::rental;
use crate::row;

/// Entries in the top-rented list.
const TOP_FILMS_LIMIT: u32 = 5;

/// Rows in the recent-activity feed.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Overdue = still out, and rented longer ago than the film's rental
/// period allows. The film is reached through inventory; rentals reference
/// copies, not titles.
const OVERDUE_COUNT: &str = "SELECT COUNT(*) FROM rental r \
     JOIN inventory i ON r.inventory_id = i.inventory_id \
     JOIN film f ON i.film_id = f.film_id \
     WHERE r.returned_date IS NULL \
     AND DATE_ADD(r.rental_date, INTERVAL f.rental_duration DAY) < NOW()";

/// Repository for the aggregate dashboard snapshot.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: Database,
}

impl DashboardRepository {
    pub(crate) fn new(db: Database) -> Self {
        DashboardRepository { db }
    }

    /// Rebuilds the full dashboard snapshot.
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let (pool, limit) = self.db.lease().await?;
        with_timeout(limit, async move {
            debug!("building dashboard snapshot");

            let (
                total_films,
                total_customers,
                total_staff,
                active_rentals,
                overdue_rentals,
                total_revenue,
                top_films,
                recent_rentals,
            ) = tokio::try_join!(
                count(&pool, "SELECT COUNT(*) FROM film"),
                count(&pool, "SELECT COUNT(*) FROM customer"),
                count(&pool, "SELECT COUNT(*) FROM staff"),
                count(
                    &pool,
                    "SELECT COUNT(*) FROM rental WHERE returned_date IS NULL"
                ),
                count(&pool, OVERDUE_COUNT),
                total_revenue(&pool),
                top_films(&pool),
                rental::fetch_recent(&pool, RECENT_ACTIVITY_LIMIT),
            )?;

            Ok(DashboardStats {
                total_films,
                total_customers,
                total_staff,
                active_rentals,
                overdue_rentals,
                total_revenue,
                top_films,
                recent_rentals,
            })
        })
        .await
    }
}

async fn count(pool: &MySqlPool, sql: &'static str) -> DbResult<i64> {
    let value: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
    Ok(value)
}

async fn total_revenue(pool: &MySqlPool) -> DbResult<Money> {
    let total: Decimal =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM payment")
            .fetch_one(pool)
            .await?;
    Ok(row::money_or_zero(Some(total), "total_revenue"))
}

async fn top_films(pool: &MySqlPool) -> DbResult<Vec<TopFilm>> {
    let sql = format!(
        "SELECT f.film_id, f.title, COUNT(r.rental_id) AS rental_count \
         FROM film f \
         JOIN inventory i ON f.film_id = i.film_id \
         JOIN rental r ON i.inventory_id = r.inventory_id \
         GROUP BY f.film_id, f.title \
         ORDER BY rental_count DESC \
         LIMIT {TOP_FILMS_LIMIT}"
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(rows.iter().map(row::top_film_from_row).collect())
}
