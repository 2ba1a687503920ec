//! Plain-text renderings used by the CLI commands.

use sift_config::settings::{DATABASE_SETTINGS, DB_PASSWORD, POOL_SETTINGS};
use sift_config::{ConfigSource, Requirement, Setting, SslMode};
use sift_db::ConnectionStats;

const REDACTED: &str = "********";
const UNSET: &str = "-";

/// Table of every variable the loader reads, with its default and the
/// value currently visible in `source`. The password is never printed.
pub fn settings_table<S: ConfigSource + ?Sized>(source: &S) -> String {
    let mut lines = vec![format!(
        "{:<28} {:<12} {:<16} {}",
        "VARIABLE", "DEFAULT", "CURRENT", "DESCRIPTION"
    )];

    for setting in DATABASE_SETTINGS.iter().chain(POOL_SETTINGS.iter()) {
        lines.push(format!(
            "{:<28} {:<12} {:<16} {}",
            setting.key,
            default_column(setting),
            current_value(setting, source),
            setting.description
        ));
    }

    let modes: Vec<&str> = SslMode::ALL.iter().map(SslMode::as_str).collect();
    lines.push(String::new());
    lines.push(format!("Supported DB_SSL_MODE values: {}", modes.join(", ")));

    lines.join("\n")
}

pub fn render_stats(stats: &ConnectionStats) -> String {
    [
        format!("Max open connections: {}", stats.max_open_connections),
        format!("Open connections:     {}", stats.open_connections),
        format!("In use:               {}", stats.in_use),
        format!("Idle:                 {}", stats.idle),
    ]
    .join("\n")
}

fn default_column(setting: &Setting) -> &'static str {
    match setting.requirement {
        Requirement::Required => "(required)",
        Requirement::Default(value) => value,
    }
}

fn current_value<S: ConfigSource + ?Sized>(setting: &Setting, source: &S) -> String {
    match source.get(setting.key).filter(|v| !v.is_empty()) {
        Some(_) if setting.key == DB_PASSWORD.key => REDACTED.to_string(),
        Some(value) => value,
        None => UNSET.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_settings_table_lists_every_variable() {
        let table = settings_table(&source(&[]));

        for setting in DATABASE_SETTINGS.iter().chain(POOL_SETTINGS.iter()) {
            assert!(table.contains(setting.key), "missing {}", setting.key);
        }
        assert!(table.contains("disable, require, verify-ca, verify-full"));
    }

    #[test]
    fn test_settings_table_hides_password() {
        let table = settings_table(&source(&[
            ("DB_USER", "alice"),
            ("DB_PASSWORD", "hunter2"),
        ]));

        assert!(table.contains("alice"));
        assert!(table.contains(REDACTED));
        assert!(!table.contains("hunter2"));
    }

    #[test]
    fn test_settings_table_marks_required_and_unset() {
        let table = settings_table(&source(&[]));
        let user_line = table
            .lines()
            .find(|line| line.starts_with("DB_USER "))
            .unwrap();

        assert!(user_line.contains("(required)"));
        assert!(user_line.contains(" - "));
    }

    #[test]
    fn test_render_stats() {
        let text = render_stats(&ConnectionStats {
            max_open_connections: 25,
            open_connections: 3,
            in_use: 1,
            idle: 2,
        });

        assert!(text.contains("Max open connections: 25"));
        assert!(text.contains("In use:               1"));
        assert!(text.ends_with("Idle:                 2"));
    }
}
