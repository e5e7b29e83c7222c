//! Two-task research pipeline: hashtag generation, then scrape and report.

mod output;
mod report;

pub use output::parse_pipeline_output;
pub use report::{CreatorInfo, HashtagEntry, HashtagReport, VideoReport};

use crate::agent::Agent;
use crate::error::Result;
use tracing::{debug, info, instrument};

/// A single unit of work for the research agent.
#[derive(Debug, Clone)]
pub struct Task {
    /// Short identifier used in logs and task outputs.
    pub name: String,
    /// Full instruction text for the agent.
    pub description: String,
    /// Hint describing the shape of a good answer.
    pub expected_output: String,
}

impl Task {
    /// Create a new task.
    pub fn new(name: &str, description: &str, expected_output: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            expected_output: expected_output.to_string(),
        }
    }

    /// Full prompt sent to the agent for this task.
    pub fn prompt(&self) -> String {
        format!("{}\n\nExpected output: {}", self.description, self.expected_output)
    }
}

/// Raw output of one executed task.
#[derive(Debug, Clone)]
pub struct TaskOutput {
    /// Name of the task that produced this output.
    pub name: String,
    /// The agent's final text for the task.
    pub raw: String,
}

/// Output of a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Raw text of the final task.
    pub raw: String,
    /// Outputs of every task, in execution order.
    pub tasks: Vec<TaskOutput>,
}

/// Executes tasks in order with a single agent, passing each task's output
/// to the next as context.
pub struct ResearchPipeline {
    agent: Agent,
    tasks: Vec<Task>,
}

impl ResearchPipeline {
    /// Create a pipeline over the given agent and tasks.
    pub fn new(agent: Agent, tasks: Vec<Task>) -> Self {
        Self { agent, tasks }
    }

    /// Run all tasks sequentially.
    #[instrument(skip(self), fields(tasks = self.tasks.len()))]
    pub async fn run(&self) -> Result<PipelineOutput> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut context: Option<String> = None;

        for task in &self.tasks {
            info!("Running task: {}", task.name);
            let response = self.agent.run(&task.prompt(), context.as_deref()).await?;
            debug!(
                "Task {} finished after {} iteration(s), {} tool call(s)",
                task.name,
                response.iterations,
                response.tool_calls.len()
            );

            context = Some(response.content.clone());
            outputs.push(TaskOutput {
                name: task.name.clone(),
                raw: response.content,
            });
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        Ok(PipelineOutput {
            raw,
            tasks: outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_prompt_appends_expected_output() {
        let task = Task::new(
            "generate_hashtags",
            "Generate hashtags from topics.",
            "A compact JSON object.",
        );
        let prompt = task.prompt();
        assert!(prompt.starts_with("Generate hashtags from topics."));
        assert!(prompt.ends_with("Expected output: A compact JSON object."));
    }
}
