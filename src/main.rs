//! Sight CLI entry point.

use anyhow::Result;
use clap::Parser;
use sight::cli::{commands, Cli, Commands};
use sight::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files before clap reads env-backed arguments.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Settings::default_config_path);

    // Load configuration
    let settings = Settings::load_from(Some(&config_path))?.with_overrides(
        cli.api_key.clone(),
        cli.api_url.clone(),
        cli.model.clone(),
    );

    // Initialize logging. Stdout carries JSON-RPC, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("sight={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command.unwrap_or(Commands::Mcp) {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Analyze { kind, source, prompt } => {
            commands::run_analyze(kind, &source, prompt, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, &config_path)?;
        }
    }

    Ok(())
}
