//! Apify-backed scrape implementation.
//!
//! Talks to the Apify REST API directly: start an actor run, poll until it
//! reaches a terminal status, then page through the run's default dataset.

use super::{HashtagScraper, ScrapeRequest, ScrapeResult};
use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default Apify actor for TikTok hashtag scraping.
pub const DEFAULT_ACTOR: &str = "GdWCkxBtKWOsKjdch";

/// Default Apify API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Items fetched per dataset page.
const DATASET_PAGE_LIMIT: u32 = 1000;

/// Timeout for individual API requests.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Apify-backed TikTok hashtag scraper.
pub struct ApifyScraper {
    client: reqwest::Client,
    token: String,
    actor: String,
    base_url: String,
    poll_interval: Duration,
}

impl ApifyScraper {
    /// Create a scraper with an explicit API token.
    pub fn new(token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            token: token.into(),
            actor: DEFAULT_ACTOR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(2),
        }
    }

    /// Create a scraper from the APIFY_API_TOKEN environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("APIFY_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ScoutError::Credential(
                    "APIFY_API_TOKEN is not set. Set it in your environment.".to_string(),
                )
            })?;
        Ok(Self::new(token))
    }

    /// Override the actor used for scraping.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Override the Apify API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the status poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Start an actor run for the given request.
    async fn start_run(&self, request: &ScrapeRequest) -> Result<RunDetail> {
        let url = format!("{}/v2/acts/{}/runs", self.base_url, self.actor);
        debug!("Starting actor run: {}", self.actor);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&ActorInput::new(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScoutError::Scrape(format!(
                "Failed to start actor run ({}): {}",
                status, body
            )));
        }

        let envelope: RunEnvelope = response.json().await?;
        Ok(envelope.data)
    }

    /// Poll the run until it reaches a terminal status.
    async fn wait_for_finish(&self, run_id: &str) -> Result<RunDetail> {
        let url = format!("{}/v2/actor-runs/{}", self.base_url, run_id);

        loop {
            let envelope: RunEnvelope = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            let run = envelope.data;

            if run.status.is_terminal() {
                if run.status != RunStatus::Succeeded {
                    return Err(ScoutError::Scrape(format!(
                        "Actor run {} ended with status {}",
                        run_id, run.status
                    )));
                }
                return Ok(run);
            }

            debug!("Run {} is {}, waiting", run_id, run.status);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetch every item from the run's dataset, preserving order.
    async fn collect_dataset(&self, dataset_id: &str) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/v2/datasets/{}/items", self.base_url, dataset_id);
        let mut items = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let page: Vec<serde_json::Value> = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("offset", offset), ("limit", DATASET_PAGE_LIMIT)])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            let count = page.len() as u32;
            items.extend(page);

            // A short page means we have reached the end
            if count < DATASET_PAGE_LIMIT {
                break;
            }
            offset += count;
        }

        Ok(items)
    }
}

#[async_trait]
impl HashtagScraper for ApifyScraper {
    #[instrument(skip(self, request), fields(count = request.hashtags().len()))]
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult> {
        info!(
            "Scraping {} hashtag(s) via actor {}",
            request.hashtags().len(),
            self.actor
        );

        let run = self.start_run(request).await?;
        let run = self.wait_for_finish(&run.id).await?;
        let data = self.collect_dataset(&run.default_dataset_id).await?;

        info!("Scrape finished with {} item(s)", data.len());
        Ok(ScrapeResult { data })
    }
}

/// Input payload for the TikTok scrape actor.
///
/// Everything except the hashtags and page size is pinned: videos only,
/// latest-first profile sorting, no media downloads apart from subtitles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActorInput<'a> {
    hashtags: &'a [String],
    results_per_page: u32,
    profile_scrape_sections: Vec<&'static str>,
    profile_sorting: &'static str,
    exclude_pinned_posts: bool,
    search_section: &'static str,
    max_profiles_per_query: u32,
    scrape_related_videos: bool,
    should_download_videos: bool,
    should_download_covers: bool,
    should_download_subtitles: bool,
    should_download_slideshow_images: bool,
    should_download_avatars: bool,
    should_download_music_covers: bool,
    proxy_country_code: &'static str,
}

impl<'a> ActorInput<'a> {
    fn new(request: &'a ScrapeRequest) -> Self {
        Self {
            hashtags: request.hashtags(),
            results_per_page: request.results_per_page(),
            profile_scrape_sections: vec!["videos"],
            profile_sorting: "latest",
            exclude_pinned_posts: false,
            search_section: "",
            max_profiles_per_query: 10,
            scrape_related_videos: false,
            should_download_videos: false,
            should_download_covers: false,
            should_download_subtitles: true,
            should_download_slideshow_images: false,
            should_download_avatars: false,
            should_download_music_covers: false,
            proxy_country_code: "None",
        }
    }
}

/// Wrapper around the `data` envelope Apify uses for run records.
#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: RunDetail,
}

/// Subset of the actor run record we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunDetail {
    id: String,
    status: RunStatus,
    default_dataset_id: String,
}

/// Actor run lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
}

impl RunStatus {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_scraper(server: &MockServer) -> ApifyScraper {
        ApifyScraper::new("test-token")
            .with_actor("test-actor")
            .with_base_url(server.uri())
            .with_poll_interval(Duration::from_millis(1))
    }

    fn run_body(status: &str) -> serde_json::Value {
        json!({
            "data": {
                "id": "run1",
                "status": status,
                "defaultDatasetId": "ds1"
            }
        })
    }

    #[tokio::test]
    async fn test_scrape_collects_dataset_items_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/acts/test-actor/runs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(run_body("RUNNING")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/actor-runs/run1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/datasets/ds1/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "v1"},
                {"id": "v2"},
                {"id": "v3"}
            ])))
            .mount(&server)
            .await;

        let scraper = test_scraper(&server);
        let request = ScrapeRequest::from_csv("cats", 10).unwrap();
        let result = scraper.scrape(&request).await.unwrap();

        assert_eq!(result.data.len(), 3);
        assert_eq!(result.data[0]["id"], "v1");
        assert_eq!(result.data[2]["id"], "v3");
    }

    #[tokio::test]
    async fn test_scrape_sends_pinned_actor_input() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/acts/test-actor/runs"))
            .and(wiremock::matchers::body_partial_json(json!({
                "hashtags": ["cats", "dogs"],
                "resultsPerPage": 5,
                "profileScrapeSections": ["videos"],
                "profileSorting": "latest",
                "shouldDownloadSubtitles": true,
                "shouldDownloadVideos": false,
                "proxyCountryCode": "None"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(run_body("SUCCEEDED")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/actor-runs/run1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/datasets/ds1/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let scraper = test_scraper(&server);
        let request = ScrapeRequest::from_csv("#cats, dogs", 5).unwrap();
        let result = scraper.scrape(&request).await.unwrap();
        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn test_scrape_paginates_dataset() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/acts/test-actor/runs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(run_body("SUCCEEDED")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/actor-runs/run1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED")))
            .mount(&server)
            .await;

        // Full first page, short second page
        let first_page: Vec<serde_json::Value> =
            (0..DATASET_PAGE_LIMIT).map(|i| json!({"n": i})).collect();
        Mock::given(method("GET"))
            .and(path("/v2/datasets/ds1/items"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/datasets/ds1/items"))
            .and(query_param("offset", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"n": 1000}])))
            .mount(&server)
            .await;

        let scraper = test_scraper(&server);
        let request = ScrapeRequest::from_csv("cats", 10).unwrap();
        let result = scraper.scrape(&request).await.unwrap();

        assert_eq!(result.data.len(), 1001);
        assert_eq!(result.data[1000]["n"], 1000);
    }

    #[tokio::test]
    async fn test_scrape_fails_on_failed_run() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/acts/test-actor/runs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(run_body("RUNNING")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/actor-runs/run1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("FAILED")))
            .mount(&server)
            .await;

        let scraper = test_scraper(&server);
        let request = ScrapeRequest::from_csv("cats", 10).unwrap();
        let err = scraper.scrape(&request).await.unwrap_err();
        assert!(err.to_string().contains("FAILED"));
    }

    #[tokio::test]
    async fn test_scrape_fails_on_rejected_start() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/acts/test-actor/runs"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"type": "token-not-found", "message": "Invalid token"}
            })))
            .mount(&server)
            .await;

        let scraper = test_scraper(&server);
        let request = ScrapeRequest::from_csv("cats", 10).unwrap();
        let err = scraper.scrape(&request).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_from_env_requires_token() {
        std::env::remove_var("APIFY_API_TOKEN");
        let err = ApifyScraper::from_env().err().unwrap();
        assert_eq!(
            err.to_string(),
            "Missing credential: APIFY_API_TOKEN is not set. Set it in your environment."
        );

        std::env::set_var("APIFY_API_TOKEN", "");
        assert!(ApifyScraper::from_env().is_err());
        std::env::remove_var("APIFY_API_TOKEN");
    }
}
