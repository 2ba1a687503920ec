//! Schema migrations.
//!
//! The SQL lives in the workspace `migrations/` directory and is embedded at
//! compile time. Every migration is idempotent, so applying it to a database
//! that was provisioned out-of-band is harmless.
//!
//! Connecting never runs migrations; they are applied explicitly, usually
//! through `sift-cli migrate`.

use sqlx::PgPool;
use sqlx::migrate::{Migration, Migrator};
use tracing::info;

use crate::error::ConnectionError;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Undefined table, raised before the first migration has been applied.
const UNDEFINED_TABLE: &str = "42P01";

/// Applied vs. available migrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: Vec<i64>,
    pub available: usize,
}

impl MigrationStatus {
    /// Embedded migrations that have not been applied yet.
    pub fn pending(&self) -> Vec<&'static Migration> {
        MIGRATOR
            .iter()
            .filter(|m| !self.applied.contains(&m.version))
            .collect()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending().is_empty()
    }
}

/// Reads which migrations have been applied.
///
/// A database that has never been migrated reports none applied.
pub async fn status(pool: &PgPool) -> Result<MigrationStatus, ConnectionError> {
    let applied = sqlx::query_scalar::<_, i64>(
        "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version",
    )
    .fetch_all(pool)
    .await;

    let applied = match applied {
        Ok(versions) => versions,
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNDEFINED_TABLE) => {
            Vec::new()
        }
        Err(e) => return Err(ConnectionError::MigrationStatus(e)),
    };

    Ok(MigrationStatus {
        applied,
        available: MIGRATOR.iter().count(),
    })
}

/// Applies all pending migrations.
pub async fn run(pool: &PgPool) -> Result<(), ConnectionError> {
    info!(available = MIGRATOR.iter().count(), "Applying database migrations");
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
