//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tagscout Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    // Check API credentials
    println!("{}", style("API Configuration").bold());
    let openai_check = check_openai_api_key();
    openai_check.print();
    checks.push(openai_check);
    let apify_check = check_apify_api_token();
    apify_check.print();
    checks.push(apify_check);

    println!();

    // Check configuration
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Effective settings the pipeline would run with
    println!("{}", style("Effective Settings").bold());
    Output::kv("model", &settings.research.model);
    Output::kv(
        "results_per_page",
        &settings.research.results_per_page.to_string(),
    );
    Output::kv("actor", &settings.scrape.actor);
    Output::kv("base_url", &settings.scrape.base_url);
    if let Some(dir) = settings.prompts_dir() {
        Output::kv("prompts_dir", &dir.display().to_string());
    }

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Tagscout.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! Tagscout is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check if Apify API token is configured.
fn check_apify_api_token() -> CheckResult {
    match std::env::var("APIFY_API_TOKEN") {
        Ok(token) if token.starts_with("apify_api_") && token.len() > 20 => {
            let masked = format!("{}...{}", &token[..10], &token[token.len() - 4..]);
            CheckResult::ok("APIFY_API_TOKEN", &format!("configured ({})", masked))
        }
        Ok(token) if token.is_empty() => CheckResult::error(
            "APIFY_API_TOKEN",
            "empty",
            "Set with: export APIFY_API_TOKEN='apify_api_...'",
        ),
        Ok(_) => CheckResult::warning(
            "APIFY_API_TOKEN",
            "set but format looks unusual",
            "Expected format: apify_api_... (Apify API token)",
        ),
        Err(_) => CheckResult::error(
            "APIFY_API_TOKEN",
            "not set",
            "Set with: export APIFY_API_TOKEN='apify_api_...'",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create one at the path shown by: tagscout config path",
        )
    }
}
