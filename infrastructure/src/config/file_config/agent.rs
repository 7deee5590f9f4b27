//! Agent configuration from TOML (`[agent]` section)

use super::model::out_of_range;
use relay_application::DispatchParams;
use relay_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Raw dispatch loop configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// reasoning = true
/// max_rounds = 10
/// history_window = 40
/// parallel_tool_calls = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Run the planning phase before each turn
    pub reasoning: bool,
    /// Tool batches per turn before a tool-less answer is forced
    pub max_rounds: usize,
    /// Messages of history shown to the planning phase
    pub history_window: usize,
    pub parallel_tool_calls: bool,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = DispatchParams::default();
        Self {
            reasoning: params.reasoning,
            max_rounds: params.max_rounds,
            history_window: params.reasoning_history_window,
            parallel_tool_calls: params.parallel_tool_calls,
        }
    }
}

impl FileAgentConfig {
    pub fn to_dispatch_params(&self) -> (DispatchParams, Vec<ConfigIssue>) {
        let defaults = DispatchParams::default();
        let mut issues = Vec::new();

        let max_rounds = if self.max_rounds == 0 {
            issues.push(out_of_range(
                "agent.max_rounds",
                format!(
                    "agent.max_rounds must be at least 1, falling back to {}",
                    defaults.max_rounds
                ),
            ));
            defaults.max_rounds
        } else {
            self.max_rounds
        };

        let params = defaults
            .with_reasoning(self.reasoning)
            .with_max_rounds(max_rounds)
            .with_reasoning_history_window(self.history_window)
            .with_parallel_tool_calls(self.parallel_tool_calls);
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let (params, issues) = FileAgentConfig::default().to_dispatch_params();
        assert!(issues.is_empty());
        assert_eq!(params, DispatchParams::default());
    }

    #[test]
    fn test_zero_rounds_falls_back() {
        let config = FileAgentConfig {
            max_rounds: 0,
            parallel_tool_calls: true,
            ..Default::default()
        };
        let (params, issues) = config.to_dispatch_params();
        assert_eq!(params.max_rounds, 10);
        assert!(params.parallel_tool_calls);
        assert_eq!(issues.len(), 1);
    }
}
