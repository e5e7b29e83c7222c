//! Tagscout - TikTok Hashtag Research
//!
//! A CLI tool that turns trending business topics into TikTok hashtags,
//! scrapes the platform through the Apify actor API, and aggregates the
//! results into a structured JSON report.
//!
//! # Overview
//!
//! Tagscout allows you to:
//! - Generate 5-10 effective hashtags for a set of business topics
//! - Scrape TikTok posts for those hashtags via an Apify actor
//! - Produce a JSON report with video metadata, creator details, and
//!   short content summaries
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `scrape` - Scrape backend abstraction and the Apify client
//! - `agent` - Tool-calling LLM agent
//! - `pipeline` - Sequential task pipeline and output parsing
//! - `research` - The wired-up research runner
//!
//! # Example
//!
//! ```rust,no_run
//! use tagscout::config::Settings;
//! use tagscout::research::ResearchRunner;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let runner = ResearchRunner::new(settings)?;
//!
//!     let topics = vec!["AI tools".to_string(), "coffee".to_string()];
//!     let report = runner.run(&topics).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod research;
pub mod scrape;

pub use error::{Result, ScoutError};
