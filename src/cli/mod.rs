//! CLI module for Tagscout.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tagscout - TikTok Hashtag Research
///
/// A CLI tool that turns trending business topics into TikTok hashtags,
/// scrapes matching posts through the Apify platform, and aggregates the
/// results into a structured JSON report.
#[derive(Parser, Debug)]
#[command(name = "tagscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full research pipeline: topics -> hashtags -> scrape -> report
    Research {
        /// Comma-separated list of trending topics, e.g. 'AI tools,coffee'
        #[arg(long)]
        topics: String,

        /// Number of videos to request per hashtag (1-50)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
        results_per_page: Option<u32>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Scrape TikTok posts for hashtags directly, without the LLM pipeline
    Scrape {
        /// Comma-separated list of hashtags, with or without '#'
        #[arg(long)]
        hashtags: String,

        /// Apify API token (falls back to the APIFY_API_TOKEN env var)
        #[arg(long)]
        apify_token: Option<String>,

        /// Number of videos to request per hashtag (1-50)
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
        results_per_page: u32,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
