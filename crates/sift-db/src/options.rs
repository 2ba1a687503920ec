//! Mapping from [`DatabaseConfig`] to sqlx connect options.

use sift_config::{DatabaseConfig, SslMode};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

const APPLICATION_NAME: &str = "sift";

/// Builds the sqlx options for `config`.
///
/// Carries the same host, port, user, password, dbname and sslmode values
/// as [`DatabaseConfig::connection_string`].
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .ssl_mode(pg_ssl_mode(config.ssl_mode))
        .application_name(APPLICATION_NAME)
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ssl_mode: SslMode) -> DatabaseConfig {
        DatabaseConfig {
            host: "db.internal".into(),
            port: 6543,
            user: "sift_user".into(),
            password: "secret".into(),
            database: "sift_app_db".into(),
            ssl_mode,
        }
    }

    #[test]
    fn test_connect_options_carry_config_fields() {
        let options = connect_options(&config(SslMode::Disable));

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "sift_user");
        assert_eq!(options.get_database(), Some("sift_app_db"));
        assert_eq!(options.get_application_name(), Some(APPLICATION_NAME));
    }

    #[test]
    fn test_ssl_mode_mapping() {
        assert!(matches!(
            connect_options(&config(SslMode::Disable)).get_ssl_mode(),
            PgSslMode::Disable
        ));
        assert!(matches!(
            connect_options(&config(SslMode::Require)).get_ssl_mode(),
            PgSslMode::Require
        ));
        assert!(matches!(
            connect_options(&config(SslMode::VerifyCa)).get_ssl_mode(),
            PgSslMode::VerifyCa
        ));
        assert!(matches!(
            connect_options(&config(SslMode::VerifyFull)).get_ssl_mode(),
            PgSslMode::VerifyFull
        ));
    }
}
