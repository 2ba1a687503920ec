//! Caller-side retry for startup ordering.
//!
//! [`ConnectionManager::connect`] makes exactly one attempt. When the
//! database may still be starting (containers brought up together, for
//! instance), wrap it in [`connect_with_retry`].

use std::time::Duration;

use tracing::warn;

use crate::error::ConnectionError;
use crate::manager::ConnectionManager;

/// Fixed attempt count with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

/// Calls `connect` until it succeeds or the policy runs out of attempts.
///
/// Returns the number of attempts that were needed. A policy with zero
/// attempts still makes one.
///
/// # Errors
///
/// Returns [`ConnectionError::RetriesExhausted`] carrying the last failure.
pub async fn connect_with_retry(
    manager: &mut ConnectionManager,
    policy: &RetryPolicy,
) -> Result<u32, ConnectionError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match manager.connect().await {
            Ok(()) => return Ok(attempt),
            Err(e) if attempt >= attempts => {
                return Err(ConnectionError::RetriesExhausted {
                    attempts,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Connection attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_config::{DatabaseConfig, PoolSettings, SslMode};

    fn unreachable_manager() -> ConnectionManager {
        let config = DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 1,
            user: "testuser".into(),
            password: "testpass".into(),
            database: "testdb".into(),
            ssl_mode: SslMode::Disable,
        };

        ConnectionManager::new(config)
            .unwrap()
            .with_pool_settings(PoolSettings {
                acquire_timeout: Duration::from_millis(500),
                ..PoolSettings::default()
            })
            .unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut manager = unreachable_manager();
        let policy = RetryPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(10),
        };

        let err = connect_with_retry(&mut manager, &policy).await.unwrap_err();

        match err {
            ConnectionError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, ConnectionError::Open(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(manager.pool().is_none());
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let mut manager = unreachable_manager();
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_millis(10),
        };

        let err = connect_with_retry(&mut manager, &policy).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::RetriesExhausted { attempts: 1, .. }
        ));
    }
}
