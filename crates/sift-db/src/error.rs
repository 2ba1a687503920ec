/// Error type for connection lifecycle operations.
///
/// The manager never retries on its own; see
/// [`connect_with_retry`](crate::retry::connect_with_retry) for a caller-side
/// retry loop.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("failed to open database connection: {0}")]
    Open(#[source] sqlx::Error),

    #[error("failed to ping database: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("database is not connected")]
    NotConnected,

    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("failed to read migration status: {0}")]
    MigrationStatus(#[source] sqlx::Error),

    #[error("giving up after {attempts} connection attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ConnectionError>,
    },
}

impl ConnectionError {
    /// Short label for the lifecycle step that failed, used as a metric label.
    pub fn stage(&self) -> &'static str {
        match self {
            ConnectionError::Open(_) => "open",
            ConnectionError::Ping(_) => "ping",
            ConnectionError::NotConnected => "not_connected",
            ConnectionError::Migrate(_) | ConnectionError::MigrationStatus(_) => "migrate",
            ConnectionError::RetriesExhausted { .. } => "retry",
        }
    }
}
