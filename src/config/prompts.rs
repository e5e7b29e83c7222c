//! Prompt templates for Tagscout.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub researcher: ResearcherPrompts,
    pub hashtag_task: HashtagTaskPrompts,
    pub report_task: ReportTaskPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Persona for the research agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearcherPrompts {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Default for ResearcherPrompts {
    fn default() -> Self {
        Self {
            role: "TikTok Research Analyst".to_string(),
            goal: "Turn trending business topics into effective TikTok hashtags, scrape the platform, and produce structured JSON with metadata, creator details, and content summaries.".to_string(),
            backstory: "You specialize in social media trend analysis. You are precise with JSON and only include fields asked for.".to_string(),
        }
    }
}

impl ResearcherPrompts {
    /// Assemble the persona into a chat system prompt.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// Prompts for the hashtag generation task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashtagTaskPrompts {
    pub description: String,
    pub expected_output: String,
}

impl Default for HashtagTaskPrompts {
    fn default() -> Self {
        Self {
            description: r#"From these trending topics: '{{topics}}'
Generate 5-10 TikTok-ready hashtags that are highly relevant.
Rules:
- No spaces; only letters/numbers.
- Do not include the leading '#'.
- Avoid duplicates and overly generic tags.
Return STRICT JSON: {"hashtags": ["tag1", "tag2", ...]}"#
                .to_string(),

            expected_output:
                "A compact JSON object with a single key 'hashtags' containing 5-10 items."
                    .to_string(),
        }
    }
}

/// Prompts for the scrape-and-summarize report task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportTaskPrompts {
    pub description: String,
    pub expected_output: String,
}

impl Default for ReportTaskPrompts {
    fn default() -> Self {
        Self {
            description: r#"Using the hashtags from the previous task, call the 'tiktok_hashtag_scrape' tool with results_per_page={{results_per_page}}.
For each hashtag, extract: (1) video metadata (hashtags, views, likes), (2) top creator account details, and (3) a concise summary of the video content.
Aggregate everything into STRICT JSON with the following high-level shape:
{
  "results": {
    "<hashtag>": {
      "videos": [
        {
          "id": string,
          "url": string,
          "hashtags": [string],
          "views": number,
          "likes": number,
          "creator": {
             "username": string,
             "nickname": string|null,
             "followers": number|null
          },
          "summary": string
        }
      ]
    }
  }
}
Notes:
- If the tool returns many items, include at least the top 5 by likes.
- Infer creator and counts from the tool output fields when present. If missing, use null.
- The 'summary' must be 1-2 sentences distilled from title/description/captions.
- Only output the JSON."#
                .to_string(),

            expected_output:
                "Strict JSON with a 'results' object keyed by hashtag, each containing a 'videos' array."
                    .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load researcher persona if file exists
            let researcher_path = custom_path.join("researcher.toml");
            if researcher_path.exists() {
                let content = std::fs::read_to_string(&researcher_path)?;
                prompts.researcher = toml::from_str(&content)?;
            }

            // Load hashtag task prompts if file exists
            let hashtag_path = custom_path.join("hashtag_task.toml");
            if hashtag_path.exists() {
                let content = std::fs::read_to_string(&hashtag_path)?;
                prompts.hashtag_task = toml::from_str(&content)?;
            }

            // Load report task prompts if file exists
            let report_path = custom_path.join("report_task.toml");
            if report_path.exists() {
                let content = std::fs::read_to_string(&report_path)?;
                prompts.report_task = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
