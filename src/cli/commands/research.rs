//! Research command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::HashtagReport;
use crate::research;
use anyhow::Result;

/// Run the research command.
pub async fn run_research(
    topics: &str,
    results_per_page: Option<u32>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Research) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tagscout doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let topics: Vec<String> = topics
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if topics.is_empty() {
        Output::error("--topics must contain at least one value.");
        return Err(anyhow::anyhow!("no topics provided"));
    }

    let spinner = Output::spinner(&format!(
        "Researching {} topic(s)...",
        topics.len()
    ));

    match research::run_research(&topics, results_per_page, model.as_deref(), settings).await {
        Ok(report) => {
            spinner.finish_and_clear();

            if let Some(typed) = HashtagReport::from_value(&report) {
                Output::success(&format!(
                    "Report covers {} hashtag(s) and {} video(s)",
                    typed.results.len(),
                    typed.video_count()
                ));
            }

            // The report itself is the only thing written to stdout
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Research failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
