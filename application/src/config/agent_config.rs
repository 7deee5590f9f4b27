//! Complete configuration of one agent.

use super::{DispatchParams, RetryPolicy, SamplingParams};
use relay_domain::PromptTemplates;
use serde::{Deserialize, Serialize};

/// Everything the dispatch loop needs besides its collaborators.
///
/// Built by the binary from the file configuration; use cases only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Provider model identifier
    pub model: String,
    /// Display name, substituted for `{name}` in prompts
    pub assistant_name: String,
    pub prompts: PromptTemplates,
    pub sampling: SamplingParams,
    pub dispatch: DispatchParams,
    pub retry: RetryPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            assistant_name: "Relay".to_string(),
            prompts: PromptTemplates::default(),
            sampling: SamplingParams::default(),
            dispatch: DispatchParams::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AgentConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn with_prompts(mut self, prompts: PromptTemplates) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchParams) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
