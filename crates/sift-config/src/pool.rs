//! Connection pool tuning.
//!
//! The defaults match the limits the service has always run with:
//! 25 open connections, 5 idle, 5 minute connection lifetime.
//!
//! # Environment Variables
//!
//! - `DB_MAX_OPEN_CONNECTIONS`: Default 25
//! - `DB_MAX_IDLE_CONNECTIONS`: Default 5
//! - `DB_CONN_MAX_LIFETIME_SECS`: Default 300
//! - `DB_ACQUIRE_TIMEOUT_SECS`: Default 30
//!
//! Unset or unparsable values fall back to the default.

use std::borrow::Cow;
use std::str::FromStr;
use std::time::Duration;

use validator::{Validate, ValidationError};

use crate::error::ConfigError;
use crate::settings::{self, Setting};
use crate::source::ConfigSource;

/// Limits applied to the connection pool.
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_idle_cap"))]
pub struct PoolSettings {
    /// Upper bound on connections, idle or in use.
    #[validate(range(min = 1, message = "max open connections must be at least 1"))]
    pub max_open_connections: u32,

    /// Connections beyond this many idle ones are closed when released.
    pub max_idle_connections: u32,

    /// Connections older than this are closed instead of reused.
    pub max_lifetime: Duration,

    /// How long to wait for a connection before giving up.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_open_connections: 25,
            max_idle_connections: 5,
            max_lifetime: Duration::from_secs(5 * 60),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

fn validate_idle_cap(settings: &PoolSettings) -> Result<(), ValidationError> {
    if settings.max_idle_connections > settings.max_open_connections {
        return Err(ValidationError::new("idle_exceeds_open").with_message(Cow::Borrowed(
            "max idle connections cannot exceed max open connections",
        )));
    }
    Ok(())
}

impl PoolSettings {
    /// Reads pool settings from `source`.
    ///
    /// Pass the same [`EnvSource`](crate::EnvSource) used for
    /// [`DatabaseConfig::from_source`](crate::DatabaseConfig::from_source) so
    /// `.env` is read once.
    #[must_use]
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Self {
        Self {
            max_open_connections: read(source, settings::DB_MAX_OPEN_CONNECTIONS, 25),
            max_idle_connections: read(source, settings::DB_MAX_IDLE_CONNECTIONS, 5),
            max_lifetime: Duration::from_secs(read(
                source,
                settings::DB_CONN_MAX_LIFETIME_SECS,
                300,
            )),
            acquire_timeout: Duration::from_secs(read(
                source,
                settings::DB_ACQUIRE_TIMEOUT_SECS,
                30,
            )),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `max_open_connections` is zero or
    /// smaller than `max_idle_connections`.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        Validate::validate(self).map_err(ConfigError::from)
    }
}

fn read<S, T>(source: &S, setting: Setting, default: T) -> T
where
    S: ConfigSource + ?Sized,
    T: FromStr,
{
    source
        .get(setting.key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
