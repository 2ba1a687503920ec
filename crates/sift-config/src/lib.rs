//! # Sift Config
//!
//! Database configuration for the Sift API.
//!
//! This crate turns named settings into a validated [`DatabaseConfig`]:
//!
//! - [`source`]: where settings come from (process environment, `.env` files, maps)
//! - [`settings`]: the table of known settings and their defaults
//! - [`database`]: the connection config, SSL modes and connection string rendering
//! - [`pool`]: connection pool tuning
//! - [`error`]: the [`ConfigError`] type
//!
//! # Example
//!
//! ```ignore
//! use sift_config::{DatabaseConfig, EnvSource, PoolSettings};
//!
//! // Reads `.env` (if present) and the process environment, once
//! let source = EnvSource::with_dotenv();
//! let config = DatabaseConfig::from_source(&source)?;
//! let pool = PoolSettings::from_source(&source);
//!
//! println!("{}", config.redacted_connection_string());
//! ```

pub mod database;
pub mod error;
pub mod pool;
pub mod settings;
pub mod source;

// Re-export commonly used types at crate root
pub use database::{DatabaseConfig, SslMode};
pub use error::ConfigError;
pub use pool::PoolSettings;
pub use settings::{Requirement, Setting};
pub use source::{ConfigSource, EnvFile, EnvSource};
