use anyhow::Result;
use std::fmt;

use crate::config::AgentConfig;
use crate::llm::{Message, Provider, ToolCall};
use crate::skills::SkillRegistry;
use crate::ui::Console;

const RESULT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// The assistant replied with the completion marker
    Completed { summary: String, iterations: usize },
    MaxIterationsReached { iterations: usize },
}

impl fmt::Display for AgentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentOutcome::Completed { summary, .. } => f.write_str(summary),
            AgentOutcome::MaxIterationsReached { .. } => f.write_str("Max iterations reached"),
        }
    }
}

/// Result of one agent run, with the full conversation for inspection
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub outcome: AgentOutcome,
    pub messages: Vec<Message>,
}

/// Bounded request/response loop that lets the model call skills.
///
/// Each iteration sends the whole conversation, records the assistant turn,
/// and either stops on the completion marker or feeds tool results back.
/// Failing tools are reported to the model as `Error: ...` text; only
/// provider errors end the run early.
pub struct AgentRunner<'a> {
    provider: &'a dyn Provider,
    skills: &'a SkillRegistry,
    config: AgentConfig,
    console: Console,
}

impl<'a> AgentRunner<'a> {
    pub fn new(provider: &'a dyn Provider, skills: &'a SkillRegistry, config: AgentConfig) -> Self {
        Self {
            provider,
            skills,
            config,
            console: Console::new(),
        }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub async fn run(&self, task: &str) -> Result<AgentRun> {
        let tools = self.skills.tool_definitions();
        let max_iterations = self.config.max_iterations;

        let mut messages = vec![
            Message::system(&self.config.system_prompt),
            Message::user(task),
        ];

        self.console.task(task);

        for iteration in 1..=max_iterations {
            self.console.iteration(iteration, max_iterations);

            let response = self.provider.chat(&messages, &tools).await?;
            tracing::debug!(
                iteration,
                tool_calls = response.tool_calls.len(),
                stop_reason = response.stop_reason.as_deref().unwrap_or(""),
                "Received assistant turn"
            );

            messages.push(Message::assistant_with_tools(
                &response.content,
                response.tool_calls.clone(),
            ));

            if response.content.starts_with(&self.config.completion_marker) {
                self.console.completed(&response.content, iteration);
                return Ok(AgentRun {
                    outcome: AgentOutcome::Completed {
                        summary: response.content,
                        iterations: iteration,
                    },
                    messages,
                });
            }

            if !response.tool_calls.is_empty() {
                for call in &response.tool_calls {
                    let result = self.dispatch(call).await;
                    messages.push(Message::tool(&call.id, result));
                }
            } else if !response.content.is_empty() {
                self.console.agent_message(&response.content);
            }
        }

        self.console
            .warn(&format!("Reached maximum iterations ({})", max_iterations));

        Ok(AgentRun {
            outcome: AgentOutcome::MaxIterationsReached {
                iterations: max_iterations,
            },
            messages,
        })
    }

    async fn dispatch(&self, call: &ToolCall) -> String {
        self.console.tool_call(call.name(), &call.function.arguments);

        let result = match call.parse_arguments() {
            Ok(args) => self.skills.execute(call.name(), &args).await,
            Err(e) => Err(e),
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = call.name(), "Tool call failed: {:#}", e);
                format!("Error: {:#}", e)
            }
        };

        let preview: String = output.chars().take(RESULT_PREVIEW_CHARS).collect();
        self.console.tool_result(call.name(), &preview);

        output
    }
}
