use anyhow::{Context, Result};
use apply_assist::cli::{handle_command, Cli};
use apply_assist::core::ConfigManager;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{error, info, warn};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apply_assist=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load_from(&cli.config, |key| std::env::var(key).ok())?;
    config.ensure_directories().await?;
    init_logging(&config.paths.log_path)?;

    info!(
        "apply-assist starting (environment: {}, log: {})",
        config.environment,
        config.paths.log_path.display()
    );
    if !cli.config.exists() {
        warn!("{} not found, using built-in defaults", cli.config.display());
    }
    info!(
        "Generation service: {}, database: {}",
        config.service.generation_url,
        config.paths.database_path.display()
    );

    if let Err(e) = handle_command(cli.command, &config).await {
        error!("Command failed: {} ({})", e, e.code());
        eprintln!("{}", e.status_message());
        for suggestion in e.suggestions() {
            eprintln!("  - {}", suggestion);
        }
        std::process::exit(1);
    }

    Ok(())
}
