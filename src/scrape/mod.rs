//! TikTok scraping through the Apify actor API.
//!
//! [`ScrapeRequest`] validates and normalizes input up front, so a request
//! that reaches a backend is always well-formed.

mod apify;

pub use apify::{ApifyScraper, DEFAULT_ACTOR, DEFAULT_BASE_URL};

use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use serde::Serialize;

/// Inclusive lower bound for results requested per hashtag page.
pub const MIN_RESULTS_PER_PAGE: u32 = 1;
/// Inclusive upper bound for results requested per hashtag page.
pub const MAX_RESULTS_PER_PAGE: u32 = 50;

/// Trait for hashtag scraping backends.
#[async_trait]
pub trait HashtagScraper: Send + Sync {
    /// Run a scrape and return every collected item.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult>;
}

/// A validated scrape request.
///
/// Construction normalizes the hashtags and checks bounds, so an invalid
/// request cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequest {
    hashtags: Vec<String>,
    results_per_page: u32,
}

impl ScrapeRequest {
    /// Build a request from raw hashtag values.
    pub fn new(hashtags: &[String], results_per_page: u32) -> Result<Self> {
        let normalized = normalize_hashtags(hashtags);
        if normalized.is_empty() {
            return Err(ScoutError::InvalidInput(
                "hashtags must contain at least one value".to_string(),
            ));
        }
        if !(MIN_RESULTS_PER_PAGE..=MAX_RESULTS_PER_PAGE).contains(&results_per_page) {
            return Err(ScoutError::InvalidInput(format!(
                "results_per_page must be between {} and {}, got {}",
                MIN_RESULTS_PER_PAGE, MAX_RESULTS_PER_PAGE, results_per_page
            )));
        }
        Ok(Self {
            hashtags: normalized,
            results_per_page,
        })
    }

    /// Build a request from a comma-separated hashtag string.
    pub fn from_csv(hashtags: &str, results_per_page: u32) -> Result<Self> {
        Self::new(&[hashtags.to_string()], results_per_page)
    }

    /// The normalized hashtags (trimmed, no leading '#').
    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// How many results to request per hashtag page.
    pub fn results_per_page(&self) -> u32 {
        self.results_per_page
    }
}

/// Raw scrape output: the backend's dataset items, in collection order.
///
/// Item schema is owned by the backend and passed through untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeResult {
    pub data: Vec<serde_json::Value>,
}

/// Normalize raw hashtag values.
///
/// Splits every value on commas, trims whitespace, strips leading '#'
/// characters and drops blank tokens. Case is preserved.
pub fn normalize_hashtags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim().trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
