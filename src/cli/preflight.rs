//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are present before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, ScoutError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Research requires both the OpenAI and Apify credentials.
    Research,
    /// Scraping requires the Apify credential.
    Scrape,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Research => {
            check_openai_key()?;
            check_apify_token()?;
        }
        Operation::Scrape => {
            check_apify_token()?;
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ScoutError::Credential(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(ScoutError::Credential(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if the Apify API token is configured.
fn check_apify_token() -> Result<()> {
    match std::env::var("APIFY_API_TOKEN") {
        Ok(token) if !token.is_empty() => Ok(()),
        Ok(_) => Err(ScoutError::Credential(
            "APIFY_API_TOKEN is empty. Set it with: export APIFY_API_TOKEN='apify_api_...'"
                .to_string(),
        )),
        Err(_) => Err(ScoutError::Credential(
            "APIFY_API_TOKEN not set. Set it with: export APIFY_API_TOKEN='apify_api_...'"
                .to_string(),
        )),
    }
}
