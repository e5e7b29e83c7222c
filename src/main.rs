//! Tagscout CLI entry point.

use anyhow::Result;
use clap::Parser;
use tagscout::cli::{commands, Cli, Commands};
use tagscout::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for JSON output
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tagscout={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Research {
            topics,
            results_per_page,
            model,
        } => {
            commands::run_research(topics, *results_per_page, model.clone(), settings).await?;
        }

        Commands::Scrape {
            hashtags,
            apify_token,
            results_per_page,
        } => {
            commands::run_scrape(hashtags, apify_token.clone(), *results_per_page, settings)
                .await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
