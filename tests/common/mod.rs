use std::collections::HashMap;
use std::time::Duration;

use fake::Fake;
use fake::faker::internet::en::{IPv4, Password, Username};
use fake::faker::lorem::en::Word;
use sift::{ConnectionManager, DatabaseConfig, PoolSettings, SslMode};

/// Number of random configurations each property is checked against.
#[allow(dead_code)]
pub const CASES: usize = 64;

/// A random, valid configuration.
#[allow(dead_code)]
pub fn fake_config() -> DatabaseConfig {
    let ssl_index: usize = (0..SslMode::ALL.len()).fake();

    DatabaseConfig {
        host: IPv4().fake(),
        port: (1..=u16::MAX).fake(),
        user: Username().fake(),
        password: Password(8..24).fake(),
        database: Word().fake(),
        ssl_mode: SslMode::ALL[ssl_index],
    }
}

/// The environment that would load back into `config`.
#[allow(dead_code)]
pub fn env_for(config: &DatabaseConfig) -> HashMap<String, String> {
    [
        ("DB_HOST", config.host.clone()),
        ("DB_PORT", config.port.to_string()),
        ("DB_USER", config.user.clone()),
        ("DB_PASSWORD", config.password.clone()),
        ("DB_NAME", config.database.clone()),
        ("DB_SSL_MODE", config.ssl_mode.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// A manager pointed at a port nothing listens on.
#[allow(dead_code)]
pub fn unreachable_manager() -> ConnectionManager {
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
            acquire_timeout: Duration::from_secs(1),
            ..PoolSettings::default()
        })
        .unwrap()
}

/// Manager for the live database, or `None` unless `INTEGRATION_TEST` is set.
///
/// Reads the usual `DB_*` variables (and `.env`).
#[allow(dead_code)]
pub fn integration_manager() -> Option<ConnectionManager> {
    if std::env::var("INTEGRATION_TEST").is_err() {
        eprintln!("skipping: INTEGRATION_TEST is not set");
        return None;
    }

    Some(ConnectionManager::from_env().expect("integration database config"))
}
