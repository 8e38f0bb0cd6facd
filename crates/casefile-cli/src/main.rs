//! Casefile CLI entry point.

use std::error::Error;
use std::sync::Arc;

use casefile_cli::commands;
use casefile_cli::config::{Cli, Config, LogFormat};
use casefile_core::clock::SystemClock;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay pipeable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    let config = Config::from_cli(&cli)?;
    tracing::debug!(mission = %config.mission.display(), store = ?config.store, "configuration loaded");

    let rendered = commands::run(&config, &cli.command, Arc::new(SystemClock)).await?;

    commands::write_report(&mut std::io::stdout().lock(), &rendered)?;
    Ok(())
}
