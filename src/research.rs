//! Research runner for Tagscout.
//!
//! Wires settings, prompts, the scrape backend and the agent into the
//! two-task research pipeline.

use crate::agent::{Agent, ToolContext};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::pipeline::{parse_pipeline_output, PipelineOutput, ResearchPipeline, Task};
use crate::scrape::{ApifyScraper, HashtagScraper};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main runner for the hashtag research pipeline.
pub struct ResearchRunner {
    settings: Settings,
    prompts: Prompts,
    scraper: Arc<dyn HashtagScraper>,
}

impl ResearchRunner {
    /// Create a runner from settings, using the Apify backend.
    ///
    /// Fails up front when APIFY_API_TOKEN is missing, before anything
    /// touches the network.
    pub fn new(settings: Settings) -> Result<Self> {
        // Load prompts (with optional custom directory and variables)
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let scraper = ApifyScraper::from_env()?
            .with_actor(&settings.scrape.actor)
            .with_base_url(&settings.scrape.base_url)
            .with_poll_interval(Duration::from_secs(settings.scrape.poll_interval_secs));

        Ok(Self {
            settings,
            prompts,
            scraper: Arc::new(scraper),
        })
    }

    /// Create a runner with a custom scrape backend.
    pub fn with_scraper(
        settings: Settings,
        prompts: Prompts,
        scraper: Arc<dyn HashtagScraper>,
    ) -> Self {
        Self {
            settings,
            prompts,
            scraper,
        }
    }

    /// Run the full research pipeline for the given topics.
    ///
    /// Returns the aggregated report, or the best partial object the
    /// fallback parser could assemble. Parsing never fails; a run with
    /// nothing usable yields the fixed error object.
    #[instrument(skip(self), fields(topics = topics.len()))]
    pub async fn run(&self, topics: &[String]) -> Result<serde_json::Value> {
        let output = self.run_pipeline(topics).await?;
        Ok(parse_pipeline_output(&output))
    }

    /// Run the pipeline and return the raw task outputs.
    pub async fn run_pipeline(&self, topics: &[String]) -> Result<PipelineOutput> {
        info!(
            "Researching {} topic(s) with model {}",
            topics.len(),
            self.settings.research.model
        );

        let agent = self.build_agent();
        let tasks = self.build_tasks(topics);
        ResearchPipeline::new(agent, tasks).run().await
    }

    fn build_agent(&self) -> Agent {
        let research = &self.settings.research;
        Agent::new(ToolContext::new(self.scraper.clone()), &research.model)
            .with_system_prompt(&self.prompts.researcher.system_prompt())
            .with_temperature(research.temperature)
            .with_max_iterations(research.max_iterations)
    }

    fn build_tasks(&self, topics: &[String]) -> Vec<Task> {
        let mut vars = HashMap::new();
        vars.insert("topics".to_string(), topics.join(", "));
        let hashtag_description = self
            .prompts
            .render_with_custom(&self.prompts.hashtag_task.description, &vars);

        let mut vars = HashMap::new();
        vars.insert(
            "results_per_page".to_string(),
            self.settings.research.results_per_page.to_string(),
        );
        let report_description = self
            .prompts
            .render_with_custom(&self.prompts.report_task.description, &vars);

        vec![
            Task::new(
                "generate_hashtags",
                &hashtag_description,
                &self.prompts.hashtag_task.expected_output,
            ),
            Task::new(
                "scrape_and_report",
                &report_description,
                &self.prompts.report_task.expected_output,
            ),
        ]
    }
}

/// Run the research pipeline once for the given topics.
///
/// `results_per_page` and `model` override the configured values when set.
pub async fn run_research(
    topics: &[String],
    results_per_page: Option<u32>,
    model: Option<&str>,
    mut settings: Settings,
) -> Result<serde_json::Value> {
    if let Some(rpp) = results_per_page {
        settings.research.results_per_page = rpp;
    }
    if let Some(m) = model {
        settings.research.model = m.to_string();
    }

    let runner = ResearchRunner::new(settings)?;
    runner.run(topics).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{ScrapeRequest, ScrapeResult};

    struct NullScraper;

    #[async_trait::async_trait]
    impl HashtagScraper for NullScraper {
        async fn scrape(&self, _request: &ScrapeRequest) -> Result<ScrapeResult> {
            Ok(ScrapeResult::default())
        }
    }

    fn test_runner() -> ResearchRunner {
        ResearchRunner::with_scraper(
            Settings::default(),
            Prompts::default(),
            Arc::new(NullScraper),
        )
    }

    #[test]
    fn test_build_tasks_renders_placeholders() {
        let runner = test_runner();
        let tasks = runner.build_tasks(&["coffee".to_string(), "latte art".to_string()]);

        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].description.contains("'coffee, latte art'"));
        assert!(tasks[1].description.contains("results_per_page=10"));
        // Nothing left unrendered
        assert!(!tasks[0].description.contains("{{"));
        assert!(!tasks[1].description.contains("{{"));
    }

    #[test]
    fn test_build_tasks_uses_configured_page_size() {
        let mut settings = Settings::default();
        settings.research.results_per_page = 25;
        let runner = ResearchRunner::with_scraper(
            settings,
            Prompts::default(),
            Arc::new(NullScraper),
        );

        let tasks = runner.build_tasks(&["fitness".to_string()]);
        assert!(tasks[1].description.contains("results_per_page=25"));
    }
}
