//! Dispatch loop state machine.
//!
//! One user turn moves through these states:
//!
//! ```text
//! Reasoning ──> Executing ──> AwaitingCompletion ──> Terminal
//!     │             │             │      ▲
//!     │             │             ▼      │
//!     │             │          Dispatching
//!     └─────────────┴─────────────┴──────────> Failed
//! ```
//!
//! `Reasoning` is optional; a turn may start directly in `Executing`.
//! `Terminal` and `Failed` are absorbing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    /// Planning-only completion, no tools attached
    Reasoning,
    /// User message appended, first completion with tools being prepared
    Executing,
    /// Waiting on a completion (with retries)
    AwaitingCompletion,
    /// Running the tool calls of the last completion
    Dispatching,
    /// Final assistant message produced
    Terminal,
    /// The turn ended with a fatal error
    Failed,
}

impl DispatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchState::Reasoning => "reasoning",
            DispatchState::Executing => "executing",
            DispatchState::AwaitingCompletion => "awaiting_completion",
            DispatchState::Dispatching => "dispatching",
            DispatchState::Terminal => "terminal",
            DispatchState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchState::Terminal | DispatchState::Failed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: DispatchState) -> bool {
        use DispatchState::*;
        match (self, next) {
            (Terminal | Failed, _) => false,
            (_, Failed) => true,
            (Reasoning, Executing) => true,
            (Executing, AwaitingCompletion) => true,
            (AwaitingCompletion, Terminal | Dispatching) => true,
            (Dispatching, AwaitingCompletion) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for DispatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
