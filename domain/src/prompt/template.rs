//! Prompt templates for the reasoning and execution phases
//!
//! Templates may contain two placeholders:
//!
//! - `{name}` - the assistant's display name
//! - `{context}` - a rendered [`PromptContext`] block (time, platform)

use serde::{Deserialize, Serialize};

/// Ambient facts injected into prompts at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub assistant_name: String,
    /// Local time, already formatted
    pub local_time: String,
    /// e.g. "linux x86_64"
    pub platform: String,
}

impl PromptContext {
    pub fn render(&self) -> String {
        format!(
            "# SYSTEM CONTEXT\n- Assistant Name: {}\n- Current Time: {}\n- Platform: {}",
            self.assistant_name, self.local_time, self.platform
        )
    }
}

/// Prompt set used by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// System message seeded into new sessions
    pub system: String,
    /// System instruction of the planning-only call
    pub reasoning: String,
    /// System instruction of the tool-enabled calls
    pub execution: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            reasoning: DEFAULT_REASONING.to_string(),
            execution: DEFAULT_EXECUTION.to_string(),
        }
    }
}

const DEFAULT_SYSTEM: &str = r#"You are {name}, a helpful assistant that can call tools to get work done.
Use tools when they help, and answer directly when they do not.

{context}"#;

const DEFAULT_REASONING: &str = r#"You are a reasoning engine focused on planning solutions to user queries.
Think through how to solve the user's query step by step WITHOUT executing any actions.

# REASONING REQUIREMENTS
1. Plan information gathering steps
2. Identify appropriate tools for each step
3. Consider validation and error handling
4. Plan the synthesis of gathered information

Do not call tools yet. Produce a concise, numbered plan.

{context}"#;

const DEFAULT_EXECUTION: &str = r#"You are {name}, an execution engine responsible for carrying out a pre-defined plan.
Follow the plan, call tools where the plan requires them, check their results,
and finish with a clear answer for the user.

{context}"#;

impl PromptTemplates {
    /// Substitute `{name}` and `{context}` in a template.
    pub fn render(template: &str, ctx: &PromptContext) -> String {
        template
            .replace("{name}", &ctx.assistant_name)
            .replace("{context}", &ctx.render())
    }

    pub fn system_prompt(&self, ctx: &PromptContext) -> String {
        Self::render(&self.system, ctx)
    }

    pub fn reasoning_prompt(&self, ctx: &PromptContext) -> String {
        Self::render(&self.reasoning, ctx)
    }

    /// Execution instruction, with the reasoning plan appended when present.
    pub fn execution_prompt(&self, ctx: &PromptContext, plan: Option<&str>) -> String {
        let base = Self::render(&self.execution, ctx);
        match plan {
            Some(plan) => format!("{}\n\nYour reasoning plan: {}", base, plan),
            None => base,
        }
    }

    /// User content of the planning-only call.
    pub fn reasoning_task(message: &str) -> String {
        format!(
            "TASK: {}\n\nProvide your step-by-step reasoning plan.",
            message
        )
    }

    /// Instruction appended when the round limit forces a final answer.
    pub fn final_synthesis_notice(max_rounds: usize) -> String {
        format!(
            "Tool round limit of {} reached. Do not request more tools. \
             Answer the user now using the information gathered so far.",
            max_rounds
        )
    }

    /// Assistant message recorded when a turn fails.
    pub fn apology(error: &str) -> String {
        format!(
            "I encountered an error while processing your message: {}. Can you try rephrasing your request?",
            error
        )
    }
}
