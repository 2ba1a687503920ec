use std::fs;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Dependencies that are too chatty at the application's log level.
const QUIET_TARGETS: [&str; 4] = ["sqlx", "hyper", "h2", "rustls"];

/// Initialize console logging, plus file logging when `LOG_DIR` is set.
///
/// # Configuration
///
/// - **Log Level**: `RUST_LOG` if set, otherwise `LOG_LEVEL` (default: "info")
/// - **Filtering**: noisy dependencies are held at warn level
/// - **Console**: compact format with file and line numbers
/// - **Files** (`LOG_DIR`): daily `sift.log` with errors only, daily
///   `sift.json` with structured info-level events
///
/// # Errors
///
/// Fails if `LOG_DIR` cannot be created or a global subscriber is
/// already installed.
pub fn init_logging() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let log_dir = std::env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty());

    let (file_layer, json_layer) = match &log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {dir}"))?;

            let file_layer = fmt::layer()
                .with_writer(RollingFileAppender::new(Rotation::DAILY, dir, "sift.log"))
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new("error"));

            // Structured logs for ingestion
            let json_layer = fmt::layer()
                .json()
                .with_writer(RollingFileAppender::new(Rotation::DAILY, dir, "sift.json"))
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(EnvFilter::new(default_directives(&log_level)));

            (Some(file_layer), Some(json_layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()
        .context("failed to install global tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!(log_dir = %dir, "File logging enabled");
    }

    Ok(())
}

fn default_directives(level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(level.to_string(), |acc, target| format!("{acc},{target}=warn"))
}
