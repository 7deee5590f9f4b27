//! Type definitions for the dispatch loop use case.

use crate::ports::completion_gateway::GatewayError;
use relay_domain::{Message, ToolCallOutcome};
use thiserror::Error;

/// Errors that end a user turn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Message cannot be empty or just whitespace")]
    EmptyMessage,

    #[error("Reasoning phase produced an empty plan")]
    EmptyReasoning,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DispatchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}

/// Result of one completed user turn
#[derive(Debug, Clone)]
pub struct TurnOutput {
    /// The terminal assistant message, as appended to the session
    pub message: Message,
    /// Plan produced by the reasoning phase of this turn
    pub reasoning_plan: Option<String>,
    /// Tool-call batches dispatched
    pub rounds: usize,
    /// Every tool call of the turn, in transcript order
    pub tool_calls: Vec<ToolCallOutcome>,
    /// The round limit forced a tool-less final answer
    pub hit_round_limit: bool,
}

impl TurnOutput {
    pub fn text(&self) -> &str {
        self.message.text()
    }

    pub fn failed_tool_calls(&self) -> usize {
        self.tool_calls.iter().filter(|o| !o.success).count()
    }
}
