//! # Sift
//!
//! PostgreSQL connection lifecycle management for the Sift API.
//!
//! ## Overview
//!
//! Sift loads database settings from the environment, validates them, and
//! owns the pooled connection handle other services query through.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── sift-config/         # Settings table, env/.env sources, validation
//! ├── sift-db/             # Connection manager, health, stats, migrations
//! ├── sift-observability/  # Logging setup
//! └── sift-cli/            # check, stats, wait, migrate, env, dsn
//! migrations/              # Embedded SQL migrations
//! ```
//!
//! ## Getting Started
//!
//! ```ignore
//! use sift::ConnectionManager;
//!
//! let mut manager = ConnectionManager::from_env()?;
//! manager.connect().await?;
//!
//! let pool = manager.pool().expect("connected");
//! let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
//!
//! manager.close().await;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DB_HOST` | `localhost` |
//! | `DB_PORT` | `5432` |
//! | `DB_USER` | required |
//! | `DB_PASSWORD` | required |
//! | `DB_NAME` | required |
//! | `DB_SSL_MODE` | `require` |
//! | `DB_MAX_OPEN_CONNECTIONS` | `25` |
//! | `DB_MAX_IDLE_CONNECTIONS` | `5` |
//! | `DB_CONN_MAX_LIFETIME_SECS` | `300` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |

pub use sift_config::{
    ConfigError, ConfigSource, DatabaseConfig, EnvFile, EnvSource, PoolSettings, SslMode,
};
pub use sift_db::{
    ConnectionError, ConnectionManager, ConnectionState, ConnectionStats, PgPool, RetryPolicy,
    connect_with_retry, migrate, ping, server_version,
};
