//! Database connection configuration.
//!
//! [`DatabaseConfig`] holds everything needed to reach the PostgreSQL server.
//! It can be loaded from a [`ConfigSource`] or built by hand; either way it
//! goes through [`DatabaseConfig::ensure_valid`] before a connection is
//! attempted.
//!
//! # Environment Variables
//!
//! - `DB_HOST`: server host (default: `localhost`)
//! - `DB_PORT`: server port (default: `5432`)
//! - `DB_USER`: user name (required)
//! - `DB_PASSWORD`: password (required)
//! - `DB_NAME`: database name (required)
//! - `DB_SSL_MODE`: `disable`, `require`, `verify-ca` or `verify-full` (default: `require`)
//!
//! # Connection String Format
//!
//! ```text
//! host=<host> port=<port> user=<user> password=<password> dbname=<database> sslmode=<mode>
//! ```

use std::fmt;
use std::str::FromStr;

use validator::Validate;

use crate::error::ConfigError;
use crate::settings;
use crate::source::{ConfigSource, EnvSource};

const REDACTED: &str = "********";

/// Transport security policy for the connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SslMode {
    Disable,
    #[default]
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub const ALL: [SslMode; 4] = [
        SslMode::Disable,
        SslMode::Require,
        SslMode::VerifyCa,
        SslMode::VerifyFull,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SslMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidSslMode {
                value: s.to_string(),
            })
    }
}

/// PostgreSQL connection settings.
#[derive(Clone, PartialEq, Eq, Validate)]
pub struct DatabaseConfig {
    #[validate(length(min = 1, message = "host cannot be empty"))]
    pub host: String,

    #[validate(range(min = 1, message = "port must be between 1 and 65535"))]
    pub port: u16,

    #[validate(length(min = 1, message = "user cannot be empty"))]
    pub user: String,

    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,

    #[validate(length(min = 1, message = "database name cannot be empty"))]
    pub database: String,

    pub ssl_mode: SslMode,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

impl DatabaseConfig {
    /// Loads the configuration from `.env` (if present) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`DatabaseConfig::from_source`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource::with_dotenv())
    }

    /// Loads the configuration from an arbitrary source.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingVar`] if `DB_USER`, `DB_PASSWORD` or `DB_NAME` is unset
    /// - [`ConfigError::InvalidPort`] if `DB_PORT` is not a base-10 integer
    /// - [`ConfigError::InvalidSslMode`] if `DB_SSL_MODE` is not a known mode
    /// - [`ConfigError::Invalid`] if the resolved values fail validation
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, ConfigError> {
        let host = settings::DB_HOST.resolve(source)?;
        let port = parse_port(&settings::DB_PORT.resolve(source)?)?;
        let user = settings::DB_USER.resolve(source)?;
        let password = settings::DB_PASSWORD.resolve(source)?;
        let database = settings::DB_NAME.resolve(source)?;
        let ssl_mode = settings::DB_SSL_MODE.resolve(source)?.parse()?;

        let config = Self {
            host,
            port,
            user,
            password,
            database,
            ssl_mode,
        };
        config.ensure_valid()?;

        Ok(config)
    }

    /// Checks every field constraint.
    ///
    /// This is the only validation routine; both the loader and
    /// direct construction of a connection manager go through it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every violated constraint.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        Validate::validate(self).map_err(ConfigError::from)
    }

    /// Renders the libpq key/value connection string.
    ///
    /// Values are inserted verbatim; callers must validate first.
    pub fn connection_string(&self) -> String {
        self.render(&self.password)
    }

    /// Same as [`connection_string`](Self::connection_string) with the
    /// password masked. Use this one for logs.
    pub fn redacted_connection_string(&self) -> String {
        self.render(REDACTED)
    }

    fn render(&self, password: &str) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host, self.port, self.user, password, self.database, self.ssl_mode,
        )
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let port: i64 = raw.parse().map_err(|source| ConfigError::InvalidPort {
        value: raw.to_string(),
        source,
    })?;

    u16::try_from(port)
        .map_err(|_| ConfigError::Invalid("port must be between 1 and 65535".to_string()))
}
