use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::PrometheusBuilder;
use sift_cli::report;
use sift_config::{DatabaseConfig, EnvSource, PoolSettings};
use sift_db::{ConnectionManager, RetryPolicy, connect_with_retry, migrate};

#[derive(Parser)]
#[command(name = "sift-cli")]
#[command(about = "Sift CLI - Database tools for the Sift API", long_about = None)]
struct Cli {
    /// Read settings from this file instead of discovering `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, ping, and report the server version
    Check,
    /// Print connection pool statistics after connecting
    Stats {
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: StatsFormat,
    },
    /// Keep trying to connect until the database accepts connections
    Wait {
        /// Maximum number of connection attempts
        #[arg(short = 'a', long, default_value = "10")]
        attempts: u32,

        /// Seconds to wait between attempts
        #[arg(short = 'd', long, default_value = "2")]
        delay_secs: u64,
    },
    /// Apply pending schema migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long)]
        dry_run: bool,
    },
    /// List the environment variables the loader reads
    Env,
    /// Print the connection string for the current settings
    Dsn {
        /// Include the password instead of masking it
        #[arg(long)]
        show_password: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatsFormat {
    Text,
    Json,
    Prometheus,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = sift_observability::init_logging() {
        eprintln!("⚠️  Logging disabled: {e:#}");
    }

    let source = match &cli.env_file {
        Some(path) => EnvSource::with_env_file(path),
        None => EnvSource::with_dotenv(),
    };

    let result = match cli.command {
        Commands::Check => handle_check(&source).await,
        Commands::Stats { format } => handle_stats(&source, format).await,
        Commands::Wait {
            attempts,
            delay_secs,
        } => handle_wait(&source, attempts, delay_secs).await,
        Commands::Migrate { dry_run } => handle_migrate(&source, dry_run).await,
        Commands::Env => {
            println!("{}", report::settings_table(&source));
            Ok(())
        }
        Commands::Dsn { show_password } => handle_dsn(&source, show_password),
    };

    if let Err(e) = result {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

fn build_manager(source: &EnvSource) -> anyhow::Result<ConnectionManager> {
    let config = DatabaseConfig::from_source(source).context("invalid database configuration")?;
    let manager = ConnectionManager::new(config)?
        .with_pool_settings(PoolSettings::from_source(source))
        .context("invalid pool settings")?;
    Ok(manager)
}

async fn connected_manager(source: &EnvSource) -> anyhow::Result<ConnectionManager> {
    let mut manager = build_manager(source)?;
    manager
        .connect()
        .await
        .with_context(|| format!("could not connect to {}", manager.config().host))?;
    Ok(manager)
}

async fn handle_check(source: &EnvSource) -> anyhow::Result<()> {
    let mut manager = connected_manager(source).await?;

    let outcome = async {
        let pool = manager.connected_pool()?;
        sift_db::ping(pool).await.context("ping failed")?;
        let version = sift_db::server_version(pool)
            .await
            .context("failed to read server version")?;
        anyhow::Ok(version)
    }
    .await;

    let stats = manager.connection_stats();
    manager.close().await;
    let version = outcome?;

    println!("\n✅ Database is reachable");
    println!("   Target: {}", manager.config().redacted_connection_string());
    println!("   Server: {}", version);
    println!("{}", indent(&report::render_stats(&stats)));
    Ok(())
}

async fn handle_stats(source: &EnvSource, format: StatsFormat) -> anyhow::Result<()> {
    let prometheus = match format {
        StatsFormat::Prometheus => Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install Prometheus recorder")?,
        ),
        _ => None,
    };

    let mut manager = connected_manager(source).await?;
    let stats = manager.connection_stats();
    manager.close().await;

    match (format, prometheus) {
        (StatsFormat::Prometheus, Some(handle)) => print!("{}", handle.render()),
        (StatsFormat::Json, _) => println!("{}", serde_json::to_string_pretty(&stats)?),
        _ => println!("{}", report::render_stats(&stats)),
    }
    Ok(())
}

async fn handle_wait(source: &EnvSource, attempts: u32, delay_secs: u64) -> anyhow::Result<()> {
    let mut manager = build_manager(source)?;
    let policy = RetryPolicy {
        max_attempts: attempts,
        delay: Duration::from_secs(delay_secs),
    };

    println!(
        "⏳ Waiting for {} (up to {} attempts)...",
        manager.config().redacted_connection_string(),
        policy.max_attempts.max(1)
    );

    let used = connect_with_retry(&mut manager, &policy).await?;
    manager.close().await;

    println!("\n✅ Database accepted a connection after {} attempt(s)", used);
    Ok(())
}

async fn handle_migrate(source: &EnvSource, dry_run: bool) -> anyhow::Result<()> {
    let mut manager = connected_manager(source).await?;

    let outcome = async {
        let pool = manager.connected_pool()?;
        let status = migrate::status(pool).await?;
        let pending = status.pending();

        if pending.is_empty() {
            println!("\n✅ Schema is up to date ({} applied)", status.applied.len());
            return anyhow::Ok(());
        }

        println!("📋 Pending migrations:");
        for migration in &pending {
            println!("   {:04} {}", migration.version, migration.description);
        }

        if dry_run {
            println!("\nDry run, nothing applied.");
            return anyhow::Ok(());
        }

        migrate::run(pool).await?;
        println!("\n✅ Applied {} migration(s)", pending.len());
        anyhow::Ok(())
    }
    .await;

    manager.close().await;
    outcome
}

fn handle_dsn(source: &EnvSource, show_password: bool) -> anyhow::Result<()> {
    let config = DatabaseConfig::from_source(source).context("invalid database configuration")?;

    if show_password {
        println!("{}", config.connection_string());
    } else {
        println!("{}", config.redacted_connection_string());
    }
    Ok(())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("   {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
