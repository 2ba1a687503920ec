//! Liveness checks against a pool.

use sqlx::{Connection, PgPool};

/// Acquires a pooled connection and pings the server with it.
///
/// # Errors
///
/// Returns the sqlx error if no connection can be acquired or the ping fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}

/// Returns the server's `version()` string.
pub async fn server_version(pool: &PgPool) -> Result<String, sqlx::Error> {
    sqlx::query_scalar("SELECT version()").fetch_one(pool).await
}
