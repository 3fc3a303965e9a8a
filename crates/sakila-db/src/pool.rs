//! # Connection Management
//!
//! Lifecycle of the connection to the MySQL store.
//!
//! ## Lifecycle
//! ```text
//! Database::new()            ← disconnected handle, injected everywhere
//!      │
//!      ▼
//! connect(&settings).await   ← closes any prior pool, then opens a new one
//!      │
//!      ▼
//! ┌─────────────────────────────────────────┐
//! │              MySqlPool                  │
//! │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐        │  (max_connections)
//! │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...    │
//! │  └─────┘ └─────┘ └─────┘ └─────┘        │
//! └─────────────────────────────────────────┘
//!      │
//!      │  reads run in parallel on separate connections;
//!      │  a transaction pins one connection for its whole sequence
//!      ▼
//! disconnect().await         ← idempotent; repositories then fail fast
//! ```
//!
//! There is no implicit reconnection: once the pool is gone, every
//! repository call returns [`DbError::NotConnected`] until the caller
//! connects again, so "never connected" and "query failed" stay
//! distinguishable.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::dashboard::DashboardRepository;
use crate::repository::film::FilmRepository;
use crate::repository::rental::RentalRepository;
use crate::repository::staff::StaffRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for the store.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use sakila_db::ConnectSettings;
///
/// let settings = ConnectSettings::new()
///     .host("db.internal")
///     .username("admin")
///     .password("s3cret")
///     .operation_timeout(Duration::from_secs(10));
/// ```
#[derive(Clone)]
pub struct ConnectSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,

    /// Maximum number of pooled connections.
    /// Default: 5 (plenty for one admin client)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long a caller may wait for a pooled connection.
    /// Default: 5 seconds
    pub acquire_timeout: Duration,

    /// Budget for one logical operation (a read, or a full composite write).
    /// Expiry abandons the wait; it does not retract an issued statement.
    /// Default: 30 seconds
    pub operation_timeout: Duration,
}

impl ConnectSettings {
    /// Creates settings with local-development defaults.
    pub fn new() -> Self {
        ConnectSettings {
            host: "127.0.0.1".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: "sakila".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(30),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

impl Default for ConnectSettings {
    fn default() -> Self {
        ConnectSettings::new()
    }
}

/// Credentials stay out of logs and error reports.
impl fmt::Debug for ConnectSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

// =============================================================================
// Database
// =============================================================================

struct Connected {
    pool: MySqlPool,
    operation_timeout: Duration,
}

/// Main database handle providing repository access.
///
/// Explicitly constructed and injected into whatever consumes it; there is
/// no ambient global instance. Clones share one connection state, so the
/// shell can hand a clone to each of its concurrent actions.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new();
/// db.connect(&ConnectSettings::new()).await?;
/// let films = db.films().list(&FilmFilter::default()).await?;
/// ```
#[derive(Clone)]
pub struct Database {
    state: Arc<RwLock<Option<Connected>>>,
}

impl Database {
    /// Creates a disconnected handle. Every repository call fails fast with
    /// [`DbError::NotConnected`] until [`connect`](Self::connect) succeeds.
    pub fn new() -> Self {
        Database {
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// Establishes the connection pool described by `settings`.
    ///
    /// A prior pool, if present, is closed first so sockets never dangle.
    /// An unreachable store surfaces [`DbError::ConnectionFailed`] with the
    /// driver's diagnostic, and the handle stays disconnected.
    pub async fn connect(&self, settings: &ConnectSettings) -> DbResult<()> {
        info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            "connecting to store"
        );

        let mut state = self.state.write().await;

        if let Some(previous) = state.take() {
            debug!("closing previous connection pool");
            previous.pool.close().await;
        }

        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.username)
            .password(&settings.password)
            .database(&settings.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        *state = Some(Connected {
            pool,
            operation_timeout: settings.operation_timeout,
        });

        info!(
            max_connections = settings.max_connections,
            "database pool created"
        );
        Ok(())
    }

    /// Closes the connection pool. Idempotent: disconnecting a handle that
    /// was never connected is a no-op, not an error.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        match state.take() {
            Some(connected) => {
                info!("closing database connection pool");
                connected.pool.close().await;
            }
            None => debug!("disconnect with no active pool; nothing to do"),
        }
    }

    /// Whether a pool is currently held.
    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Checks that the store answers queries.
    pub async fn health_check(&self) -> bool {
        let Ok(pool) = self.pool().await else {
            return false;
        };
        sqlx::query("SELECT 1").execute(&pool).await.is_ok()
    }

    /// Returns the live pool, failing fast when disconnected.
    ///
    /// For advanced statements not covered by repositories; prefer the
    /// repository methods when one fits.
    pub async fn pool(&self) -> DbResult<MySqlPool> {
        Ok(self.lease().await?.0)
    }

    /// The pool plus the operation budget repositories run under.
    pub(crate) async fn lease(&self) -> DbResult<(MySqlPool, Duration)> {
        match self.state.read().await.as_ref() {
            Some(connected) => Ok((connected.pool.clone(), connected.operation_timeout)),
            None => Err(DbError::NotConnected),
        }
    }

    /// Returns the film repository.
    pub fn films(&self) -> FilmRepository {
        FilmRepository::new(self.clone())
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.clone())
    }

    /// Returns the staff repository.
    pub fn staff(&self) -> StaffRepository {
        StaffRepository::new(self.clone())
    }

    /// Returns the rental repository.
    pub fn rentals(&self) -> RentalRepository {
        RentalRepository::new(self.clone())
    }

    /// Returns the dashboard aggregation repository.
    pub fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.clone())
    }
}

impl Default for Database {
    fn default() -> Self {
        Database::new()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

// =============================================================================
// Operation Budget
// =============================================================================

/// Bounds one logical operation. On expiry the wait is abandoned and
/// [`DbError::Timeout`] is returned; any statement already on the wire is
/// not retracted (an interrupted transaction rolls back on drop).
pub(crate) async fn with_timeout<T, F>(limit: Duration, op: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(DbError::Timeout { limit }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_builder() {
        let settings = ConnectSettings::new()
            .host("db.internal")
            .port(3307)
            .database("rentals")
            .max_connections(10);

        assert_eq!(settings.host, "db.internal");
        assert_eq!(settings.port, 3307);
        assert_eq!(settings.database, "rentals");
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_connections, 1);
    }

    #[test]
    fn debug_redacts_password() {
        let settings = ConnectSettings::new().password("hunter2");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn disconnected_handle_fails_fast() {
        let db = Database::new();

        assert!(!db.is_connected().await);
        assert!(matches!(db.pool().await, Err(DbError::NotConnected)));
        assert!(matches!(
            db.films().list(&Default::default()).await,
            Err(DbError::NotConnected)
        ));
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let db = Database::new();
        db.disconnect().await;
        db.disconnect().await;
        assert!(!db.is_connected().await);
    }

    #[tokio::test]
    async fn operation_budget_expires() {
        let result: DbResult<()> = with_timeout(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(DbError::Timeout { .. })));
    }
}
