//! The table of settings the loader understands.
//!
//! Each [`Setting`] declares whether it is required or falls back to a
//! default, so the loader has a single place that decides what "unset"
//! means.

use crate::error::ConfigError;
use crate::source::ConfigSource;

/// Whether a setting must be provided or has a fallback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Absence is a hard error.
    Required,
    /// Absence resolves to the given value.
    Default(&'static str),
}

/// A named setting read from a [`ConfigSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub key: &'static str,
    pub requirement: Requirement,
    pub description: &'static str,
}

impl Setting {
    pub const fn required(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            requirement: Requirement::Required,
            description,
        }
    }

    pub const fn optional(
        key: &'static str,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            requirement: Requirement::Default(default),
            description,
        }
    }

    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }

    /// Reads the setting from `source`, applying its default.
    ///
    /// An empty value is treated the same as an unset one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] if a required setting is unset.
    pub fn resolve<S: ConfigSource + ?Sized>(&self, source: &S) -> Result<String, ConfigError> {
        match (source.get(self.key).filter(|v| !v.is_empty()), self.requirement) {
            (Some(value), _) => Ok(value),
            (None, Requirement::Default(default)) => Ok(default.to_string()),
            (None, Requirement::Required) => Err(ConfigError::MissingVar { key: self.key }),
        }
    }
}

pub const DB_HOST: Setting = Setting::optional("DB_HOST", "localhost", "Database server host");
pub const DB_PORT: Setting = Setting::optional("DB_PORT", "5432", "Database server port");
pub const DB_USER: Setting = Setting::required("DB_USER", "Database user name");
pub const DB_PASSWORD: Setting = Setting::required("DB_PASSWORD", "Database user password");
pub const DB_NAME: Setting = Setting::required("DB_NAME", "Database name");
pub const DB_SSL_MODE: Setting = Setting::optional(
    "DB_SSL_MODE",
    "require",
    "SSL mode: disable, require, verify-ca or verify-full",
);

pub const DB_MAX_OPEN_CONNECTIONS: Setting = Setting::optional(
    "DB_MAX_OPEN_CONNECTIONS",
    "25",
    "Maximum open connections in the pool",
);
pub const DB_MAX_IDLE_CONNECTIONS: Setting = Setting::optional(
    "DB_MAX_IDLE_CONNECTIONS",
    "5",
    "Maximum idle connections kept in the pool",
);
pub const DB_CONN_MAX_LIFETIME_SECS: Setting = Setting::optional(
    "DB_CONN_MAX_LIFETIME_SECS",
    "300",
    "Maximum lifetime of a pooled connection in seconds",
);
pub const DB_ACQUIRE_TIMEOUT_SECS: Setting = Setting::optional(
    "DB_ACQUIRE_TIMEOUT_SECS",
    "30",
    "Seconds to wait for a pooled connection",
);

/// Settings that make up a [`DatabaseConfig`](crate::DatabaseConfig).
pub const DATABASE_SETTINGS: [Setting; 6] =
    [DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME, DB_SSL_MODE];

/// Settings that make up [`PoolSettings`](crate::PoolSettings).
pub const POOL_SETTINGS: [Setting; 4] = [
    DB_MAX_OPEN_CONNECTIONS,
    DB_MAX_IDLE_CONNECTIONS,
    DB_CONN_MAX_LIFETIME_SECS,
    DB_ACQUIRE_TIMEOUT_SECS,
];
