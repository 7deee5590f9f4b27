//! Dispatch loop control parameters.
//!
//! [`DispatchParams`] groups the static parameters that control one user
//! turn in [`DispatchLoopUseCase`](crate::use_cases::dispatch_loop::DispatchLoopUseCase).

use serde::{Deserialize, Serialize};

/// Loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Run a tool-free planning completion before execution.
    pub reasoning: bool,
    /// Non-system messages shown to the reasoning call.
    pub reasoning_history_window: usize,
    /// Tool-call rounds allowed per turn before a final answer is forced.
    pub max_rounds: usize,
    /// Run the calls of one batch concurrently.
    pub parallel_tool_calls: bool,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            reasoning: true,
            reasoning_history_window: 40,
            max_rounds: 10,
            parallel_tool_calls: false,
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_reasoning(mut self, enabled: bool) -> Self {
        self.reasoning = enabled;
        self
    }

    pub fn with_reasoning_history_window(mut self, window: usize) -> Self {
        self.reasoning_history_window = window;
        self
    }

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DispatchParams::default();
        assert!(params.reasoning);
        assert_eq!(params.reasoning_history_window, 40);
        assert_eq!(params.max_rounds, 10);
        assert!(!params.parallel_tool_calls);
    }

    #[test]
    fn test_builder() {
        let params = DispatchParams::default()
            .with_reasoning(false)
            .with_max_rounds(3)
            .with_parallel_tool_calls(true);

        assert!(!params.reasoning);
        assert_eq!(params.max_rounds, 3);
        assert!(params.parallel_tool_calls);
    }
}
