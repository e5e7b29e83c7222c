//! Configuration module for Tagscout.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{HashtagTaskPrompts, Prompts, ReportTaskPrompts, ResearcherPrompts};
pub use settings::{
    GeneralSettings, PromptSettings, ResearchSettings, ScrapeSettings, Settings,
};
