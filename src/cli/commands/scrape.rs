//! Scrape command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::scrape::{ApifyScraper, HashtagScraper, ScrapeRequest};
use anyhow::Result;
use std::time::Duration;

/// File the scraped dataset is written to, in the working directory.
const RESULT_FILE: &str = "result.json";

/// Run the scrape command.
pub async fn run_scrape(
    hashtags: &str,
    apify_token: Option<String>,
    results_per_page: u32,
    settings: Settings,
) -> Result<()> {
    // An explicit token flag takes precedence over the environment
    let scraper = match apify_token {
        Some(token) if !token.is_empty() => ApifyScraper::new(token),
        _ => {
            if let Err(e) = preflight::check(Operation::Scrape) {
                Output::error(&format!("{}", e));
                Output::info("Run 'tagscout doctor' for detailed diagnostics.");
                return Err(e.into());
            }
            ApifyScraper::from_env()?
        }
    };

    let scraper = scraper
        .with_actor(&settings.scrape.actor)
        .with_base_url(&settings.scrape.base_url)
        .with_poll_interval(Duration::from_secs(settings.scrape.poll_interval_secs));

    let request = match ScrapeRequest::from_csv(hashtags, results_per_page) {
        Ok(request) => request,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    let spinner = Output::spinner(&format!(
        "Scraping {} hashtag(s)...",
        request.hashtags().len()
    ));

    match scraper.scrape(&request).await {
        Ok(result) => {
            spinner.finish_and_clear();

            let json = serde_json::to_string_pretty(&result)?;
            std::fs::write(RESULT_FILE, &json)?;
            Output::success(&format!(
                "Wrote {} item(s) to {}",
                result.data.len(),
                RESULT_FILE
            ));

            println!("{}", json);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Error running scraper: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
