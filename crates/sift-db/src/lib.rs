//! # Sift DB
//!
//! PostgreSQL connection lifecycle for the Sift API.
//!
//! This crate owns the pooled connection handle: it opens the pool from a
//! validated [`DatabaseConfig`](sift_config::DatabaseConfig), checks
//! liveness, recovers after failures and reports pool statistics. Queries
//! are issued by callers directly against the [`PgPool`] it hands out.
//!
//! # Example
//!
//! ```ignore
//! use sift_db::ConnectionManager;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut manager = ConnectionManager::from_env()?;
//!     manager.connect().await?;
//!
//!     if let Some(pool) = manager.pool() {
//!         // Use pool for database operations
//!     }
//!
//!     manager.close().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod health;
pub mod manager;
pub mod metrics;
pub mod migrate;
pub mod options;
pub mod retry;
pub mod stats;

pub use error::ConnectionError;
pub use health::{ping, server_version};
pub use manager::{ConnectionManager, ConnectionState};
pub use options::connect_options;
pub use retry::{RetryPolicy, connect_with_retry};
pub use stats::ConnectionStats;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
