//! Integration tests against a live MySQL server loaded with the sakila
//! dataset. They mutate data, so they are `#[ignore]`d by default; run them
//! against a disposable database with:
//!
//! ```text
//! SAKILA_DB_HOST=127.0.0.1 SAKILA_DB_USER=root SAKILA_DB_PASSWORD=... \
//!     cargo test -p sakila-db --test live -- --ignored
//! ```

use std::env;
use std::time::Duration;

use sakila_core::NewCustomer;
use sakila_db::{ConnectSettings, Database, DbError, FilmFilter};

fn settings_from_env() -> ConnectSettings {
    let mut settings = ConnectSettings::new()
        .acquire_timeout(Duration::from_secs(5))
        .operation_timeout(Duration::from_secs(15));

    if let Ok(host) = env::var("SAKILA_DB_HOST") {
        settings = settings.host(host);
    }
    if let Ok(port) = env::var("SAKILA_DB_PORT") {
        if let Ok(port) = port.parse() {
            settings = settings.port(port);
        }
    }
    if let Ok(user) = env::var("SAKILA_DB_USER") {
        settings = settings.username(user);
    }
    if let Ok(password) = env::var("SAKILA_DB_PASSWORD") {
        settings = settings.password(password);
    }
    if let Ok(database) = env::var("SAKILA_DB_NAME") {
        settings = settings.database(database);
    }
    settings
}

async fn connected() -> Database {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sakila_db=debug".into()),
        )
        .try_init();

    let db = Database::new();
    db.connect(&settings_from_env())
        .await
        .expect("live database unreachable; is the sakila server up?");
    db
}

#[tokio::test]
#[ignore = "needs a live sakila database"]
async fn film_search_and_detail() {
    let db = connected().await;

    let filter = FilmFilter {
        search: Some("academy".to_string()),
        ..Default::default()
    };
    let films = db.films().list(&filter).await.unwrap();
    assert!(!films.is_empty(), "sakila always ships ACADEMY DINOSAUR");

    let detail = db.films().detail(films[0].id).await.unwrap();
    assert_eq!(detail.film.id, films[0].id);
    assert!(!detail.actors.is_empty());

    let missing = db.films().detail(999_999).await;
    assert!(matches!(missing, Err(DbError::NotFound { .. })));

    db.disconnect().await;
}

#[tokio::test]
#[ignore = "needs a live sakila database"]
async fn rental_round_trip_creates_exactly_one_payment() {
    let db = connected().await;

    let films = db.films().list(&FilmFilter::default()).await.unwrap();
    let inventory = db
        .films()
        .available_inventory(films[0].id)
        .await
        .unwrap();
    let copy = inventory
        .iter()
        .find(|item| item.available)
        .expect("no available copy to rent");

    let customers = db.customers().list(&Default::default()).await.unwrap();
    let staff = db.staff().list().await.unwrap();

    let rental_id = db
        .rentals()
        .create(copy.id, customers[0].id, staff[0].id)
        .await
        .unwrap();
    assert!(rental_id > 0);

    let active = db.rentals().active().await.unwrap();
    assert!(active.iter().any(|rental| rental.id == rental_id));

    db.rentals().process_return(rental_id).await.unwrap();
    let active = db.rentals().active().await.unwrap();
    assert!(!active.iter().any(|rental| rental.id == rental_id));

    // A second return of the same id still matches the row, but a bogus id
    // must surface NotFound rather than silent success.
    let missing = db.rentals().process_return(999_999_999).await;
    assert!(matches!(missing, Err(DbError::NotFound { .. })));

    db.disconnect().await;
}

#[tokio::test]
#[ignore = "needs a live sakila database"]
async fn customer_lifecycle_and_dependency_order() {
    let db = connected().await;

    let cities = db.customers().cities().await.unwrap();
    let new_customer = NewCustomer {
        first_name: "INTEGRATION".to_string(),
        last_name: "TEST".to_string(),
        email: Some("integration.test@sakilacustomer.org".to_string()),
        store_id: 1,
        address: "1 Test Way".to_string(),
        district: "Test".to_string(),
        city_id: cities[0].id,
        postal_code: "00000".to_string(),
        phone: "0000000000".to_string(),
    };
    let customer_id = db.customers().add(&new_customer).await.unwrap();
    assert!(customer_id > 0);

    // Deleting the primary row while dependents exist violates referential
    // order; the typed error must say so.
    let films = db.films().list(&FilmFilter::default()).await.unwrap();
    let inventory = db.films().available_inventory(films[0].id).await.unwrap();
    let copy = inventory.iter().find(|item| item.available).unwrap();
    let staff = db.staff().list().await.unwrap();
    db.rentals()
        .create(copy.id, customer_id, staff[0].id)
        .await
        .unwrap();

    let pool = db.pool().await.unwrap();
    let direct = sqlx::query("DELETE FROM customer WHERE customer_id = ?")
        .bind(customer_id)
        .execute(&pool)
        .await;
    let direct_err: DbError = direct.expect_err("delete must bounce").into();
    assert!(matches!(direct_err, DbError::ConstraintViolation { .. }));

    // The repository deletes dependents first and leaves no orphans.
    db.customers().delete(customer_id).await.unwrap();

    let orphan_payments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM payment WHERE customer_id = ?")
            .bind(customer_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    let orphan_rentals: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM rental WHERE customer_id = ?")
            .bind(customer_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!((orphan_payments, orphan_rentals), (0, 0));

    db.disconnect().await;
}

#[tokio::test]
#[ignore = "needs a live sakila database"]
async fn dashboard_snapshot_is_complete() {
    let db = connected().await;

    let stats = db.dashboard().stats().await.unwrap();
    assert!(stats.total_films > 0);
    assert!(stats.total_customers > 0);
    assert!(stats.top_films.len() <= 5);
    assert!(stats.recent_rentals.len() <= 10);
    for rental in &stats.recent_rentals {
        assert_eq!(rental.is_active(), rental.return_date.is_none());
    }

    db.disconnect().await;
}

#[tokio::test]
#[ignore = "needs a live sakila database"]
async fn concurrent_reads_and_writes_do_not_interleave() {
    let db = connected().await;

    let films = db.films().list(&FilmFilter::default()).await.unwrap();
    let inventory = db.films().available_inventory(films[0].id).await.unwrap();
    let copy = inventory.iter().find(|item| item.available).unwrap();
    let customers = db.customers().list(&Default::default()).await.unwrap();
    let staff = db.staff().list().await.unwrap();

    // Two reads race one composite write; each operation must come back
    // internally consistent.
    let films_repo = db.films();
    let dashboard_repo = db.dashboard();
    let rentals_repo = db.rentals();
    let filter = FilmFilter::default();
    let (list, stats, rental_id) = tokio::try_join!(
        films_repo.list(&filter),
        dashboard_repo.stats(),
        rentals_repo.create(copy.id, customers[0].id, staff[0].id),
    )
    .unwrap();

    assert!(!list.is_empty());
    assert!(stats.total_films > 0);
    db.rentals().process_return(rental_id).await.unwrap();

    db.disconnect().await;
}
