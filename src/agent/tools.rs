//! Tool definitions and implementations for the research agent.

use crate::error::{Result, ScoutError};
use crate::scrape::{HashtagScraper, ScrapeRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the scrape tool as exposed to the model.
pub const SCRAPE_TOOL_NAME: &str = "tiktok_hashtag_scrape";

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Scrape TikTok posts for a list of hashtags.
    TiktokHashtagScrape {
        hashtags: Vec<String>,
        #[serde(default = "default_results_per_page")]
        results_per_page: u32,
    },
}

fn default_results_per_page() -> u32 {
    10
}

/// Tool execution context with access to the scrape backend.
pub struct ToolContext {
    pub scraper: Arc<dyn HashtagScraper>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(scraper: Arc<dyn HashtagScraper>) -> Self {
        Self { scraper }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::TiktokHashtagScrape {
                hashtags,
                results_per_page,
            } => self.execute_scrape(hashtags, *results_per_page).await,
        }
    }

    async fn execute_scrape(&self, hashtags: &[String], results_per_page: u32) -> Result<String> {
        // Validation happens before the backend sees anything
        let request = ScrapeRequest::new(hashtags, results_per_page)?;
        let result = self.scraper.scrape(&request).await?;
        Ok(serde_json::to_string(&result)?)
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: SCRAPE_TOOL_NAME.to_string(),
            description: Some(
                "Scrape TikTok posts for the given list of hashtags and return the JSON results. \
                Requires APIFY_API_TOKEN to be set."
                    .to_string(),
            ),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "hashtags": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of hashtags to scrape (without the leading #)."
                    },
                    "results_per_page": {
                        "type": "integer",
                        "description": "How many results per page to fetch from Apify (1-50, default: 10)",
                        "default": 10
                    }
                },
                "required": ["hashtags"]
            })),
            strict: None,
        },
    }]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    // Parse the arguments JSON and construct the appropriate ToolCall variant
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| ScoutError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        SCRAPE_TOOL_NAME => {
            // Models send hashtags as an array or as one comma-separated string
            let hashtags = match &args["hashtags"] {
                serde_json::Value::Array(values) => values
                    .iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                serde_json::Value::String(s) => vec![s.clone()],
                _ => {
                    return Err(ScoutError::Agent(
                        "hashtags must be a list or comma-separated string".to_string(),
                    ))
                }
            };
            // The default applies only when the field is absent; a present
            // value must be a plain unsigned integer
            let results_per_page = match args.get("results_per_page") {
                None => default_results_per_page(),
                Some(value) => value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        ScoutError::Agent(format!("Invalid results_per_page: {}", value))
                    })?,
            };
            Ok(ToolCall::TiktokHashtagScrape {
                hashtags,
                results_per_page,
            })
        }
        _ => Err(ScoutError::Agent(format!("Unknown tool: {}", name))),
    }
}
