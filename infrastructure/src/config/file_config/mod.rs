//! Raw TOML configuration data types
//!
//! These structs mirror the config file one section per type. Every field
//! has a default, so a partial file (or none at all) is valid. Bad values
//! are reported by [`FileConfig::validate`] and replaced by defaults.

mod agent;
mod model;
mod prompts;
mod retry;
mod schema;
mod session;

pub use agent::FileAgentConfig;
pub use model::{DEFAULT_BASE_URL, FileModelConfig};
pub use prompts::FilePromptsConfig;
pub use retry::FileRetryConfig;
pub use schema::FileSchemaConfig;
pub use session::{FileLoggingConfig, FileSessionConfig};

use relay_application::AgentConfig;
use relay_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub model: FileModelConfig,
    pub agent: FileAgentConfig,
    pub retry: FileRetryConfig,
    pub prompts: FilePromptsConfig,
    pub schema: FileSchemaConfig,
    pub session: FileSessionConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Every detected issue, across all sections.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.model.validate());
        issues.extend(self.agent.to_dispatch_params().1);
        issues.extend(self.retry.to_retry_policy().1);
        issues.extend(self.prompts.validate());
        issues.extend(self.schema.parse_profile().1);
        issues
    }

    /// Resolve into the application's agent configuration.
    ///
    /// Invalid values have already fallen back to their defaults; call
    /// [`validate`](Self::validate) to report them.
    pub fn to_agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_model(self.model.name.clone())
            .with_assistant_name(self.model.display_name.clone())
            .with_prompts(self.prompts.to_templates())
            .with_sampling(self.model.to_sampling().0)
            .with_dispatch(self.agent.to_dispatch_params().0)
            .with_retry(self.retry.to_retry_policy().0)
    }
}
