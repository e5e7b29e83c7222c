//! Agent system for LLM-driven hashtag research with tool calling.
//!
//! Provides the research agent that generates hashtags, invokes the TikTok
//! scrape tool, and summarizes the results.

mod runner;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, SCRAPE_TOOL_NAME};
