//! The connection manager.
//!
//! [`ConnectionManager`] owns at most one live [`PgPool`]. Lifecycle
//! methods take `&mut self`; callers that share a manager across tasks
//! wrap it in their own lock.

use std::fmt;
use std::sync::{Arc, Mutex};

use sift_config::{ConfigError, DatabaseConfig, EnvSource, PoolSettings};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ConnectionError;
use crate::health;
use crate::metrics;
use crate::options::connect_options;
use crate::stats::ConnectionStats;

/// Lifecycle state of the manager's handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Validated config, no pool opened yet.
    Configured,
    /// A pool is open and answered a ping when it was opened.
    Connected,
    /// The last pool was closed. `connect` may be called again.
    Closed,
}

/// Caps the number of idle connections.
///
/// sqlx has no idle ceiling of its own, so the pool's release hook asks
/// this cap whether a returning connection should be kept. The hook needs
/// the pool it belongs to, which is only known after the pool is built;
/// `attach` fills that in and `detach` clears it again so the pool does not
/// keep itself alive.
#[derive(Clone)]
struct IdleCap {
    pool: Arc<Mutex<Option<PgPool>>>,
    max_idle: usize,
}

impl IdleCap {
    fn new(max_idle: u32) -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            max_idle: usize::try_from(max_idle).unwrap_or(usize::MAX),
        }
    }

    fn attach(&self, pool: &PgPool) {
        if let Ok(mut slot) = self.pool.lock() {
            *slot = Some(pool.clone());
        }
    }

    fn detach(&self) {
        if let Ok(mut slot) = self.pool.lock() {
            slot.take();
        }
    }

    fn keep(&self) -> bool {
        let idle = self
            .pool
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(PgPool::num_idle));

        idle.is_none_or(|idle| idle < self.max_idle)
    }
}

struct Handle {
    pool: PgPool,
    idle_cap: IdleCap,
}

impl Handle {
    async fn close(&self) {
        self.idle_cap.detach();
        self.pool.close().await;
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.idle_cap.detach();
    }
}

/// Owns the database configuration and the pooled connection handle.
pub struct ConnectionManager {
    config: DatabaseConfig,
    pool_settings: PoolSettings,
    handle: Option<Handle>,
    state: ConnectionState,
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("config", &self.config)
            .field("pool_settings", &self.pool_settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TryFrom<Option<DatabaseConfig>> for ConnectionManager {
    type Error = ConfigError;

    fn try_from(config: Option<DatabaseConfig>) -> Result<Self, Self::Error> {
        config.ok_or(ConfigError::MissingConfig).and_then(Self::new)
    }
}

impl ConnectionManager {
    /// Creates a manager for `config` without connecting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn new(config: DatabaseConfig) -> Result<Self, ConfigError> {
        config.ensure_valid()?;

        Ok(Self {
            config,
            pool_settings: PoolSettings::default(),
            handle: None,
            state: ConnectionState::Configured,
        })
    }

    /// Loads config and pool settings from `.env` and the process
    /// environment, then creates a manager without connecting.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from loading or validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = EnvSource::with_dotenv();
        let config = DatabaseConfig::from_source(&source)?;

        Self::new(config)?.with_pool_settings(PoolSettings::from_source(&source))
    }

    /// Replaces the pool limits used by the next `connect`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the settings fail validation.
    pub fn with_pool_settings(mut self, settings: PoolSettings) -> Result<Self, ConfigError> {
        settings.ensure_valid()?;
        self.pool_settings = settings;
        Ok(self)
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn pool_settings(&self) -> &PoolSettings {
        &self.pool_settings
    }

    /// The live pool, or `None` before the first successful `connect` and
    /// after `close`.
    pub fn pool(&self) -> Option<&PgPool> {
        self.handle.as_ref().map(|handle| &handle.pool)
    }

    /// Like [`pool`](Self::pool), for callers that need a live pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NotConnected`] if there is no pool.
    pub fn connected_pool(&self) -> Result<&PgPool, ConnectionError> {
        self.pool().ok_or(ConnectionError::NotConnected)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Opens a pool and verifies it with a ping.
    ///
    /// On failure the manager is left exactly as it was. On success the new
    /// pool replaces (and closes) any previous one.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::Open`] if the pool cannot be opened
    /// - [`ConnectionError::Ping`] if the server does not answer the ping
    #[instrument(skip(self), fields(db.host = %self.config.host, db.name = %self.config.database))]
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        debug!(dsn = %self.config.redacted_connection_string(), "Opening database pool");

        let handle = match self.open().await {
            Ok(handle) => handle,
            Err(e) => {
                metrics::track_connect_failure(e.stage());
                error!(error = %e, "Failed to connect to database");
                return Err(e);
            }
        };

        if let Some(previous) = self.handle.replace(handle) {
            debug!("Closing previous database pool");
            previous.close().await;
        }
        self.state = ConnectionState::Connected;

        metrics::track_connect_success();
        info!(
            database = %self.config.database,
            "Successfully connected to PostgreSQL database"
        );

        Ok(())
    }

    async fn open(&self) -> Result<Handle, ConnectionError> {
        let settings = &self.pool_settings;
        let idle_cap = IdleCap::new(settings.max_idle_connections);
        let hook = idle_cap.clone();

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_open_connections)
            .max_lifetime(settings.max_lifetime)
            .acquire_timeout(settings.acquire_timeout)
            .after_release(move |_conn, _meta| {
                let keep = hook.keep();
                Box::pin(async move { Ok::<_, sqlx::Error>(keep) })
            })
            .connect_with(connect_options(&self.config))
            .await
            .map_err(ConnectionError::Open)?;

        let handle = Handle { pool, idle_cap };
        handle.idle_cap.attach(&handle.pool);

        if let Err(e) = health::ping(&handle.pool).await {
            handle.close().await;
            return Err(ConnectionError::Ping(e));
        }

        Ok(handle)
    }

    /// Reports whether the pool is open and answers a ping.
    ///
    /// Never changes the manager's state.
    pub async fn is_connected(&self) -> bool {
        let Some(handle) = &self.handle else {
            return false;
        };

        if handle.pool.is_closed() {
            return false;
        }

        match health::ping(&handle.pool).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database liveness probe failed");
                false
            }
        }
    }

    /// Closes the current pool, if any, and connects again.
    ///
    /// # Errors
    ///
    /// Returns the error from [`connect`](Self::connect). The previous pool
    /// stays closed in that case.
    #[instrument(skip(self), fields(db.name = %self.config.database))]
    pub async fn reconnect(&mut self) -> Result<(), ConnectionError> {
        info!("Reconnecting to database");
        metrics::track_reconnect();

        self.release().await;
        self.connect().await
    }

    /// Closes the pool. A no-op if there is none.
    ///
    /// Waits for checked-out connections to be returned.
    pub async fn close(&mut self) {
        if self.release().await {
            info!("Database connection closed successfully");
        }
    }

    async fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.close().await;
                self.state = ConnectionState::Closed;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the pool; all zero when there is none.
    pub fn connection_stats(&self) -> ConnectionStats {
        let stats = self
            .pool()
            .map(ConnectionStats::from_pool)
            .unwrap_or_default();

        metrics::record_pool_stats(&stats);
        stats
    }
}
