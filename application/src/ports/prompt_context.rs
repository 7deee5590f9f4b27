//! Port supplying ambient prompt facts (clock, platform).

use relay_domain::PromptContext;

pub trait PromptContextProvider: Send + Sync {
    fn prompt_context(&self, assistant_name: &str) -> PromptContext;
}

/// Fixed context, used by tests and reproducible runs.
#[derive(Debug, Clone)]
pub struct StaticPromptContext {
    pub local_time: String,
    pub platform: String,
}

impl Default for StaticPromptContext {
    fn default() -> Self {
        Self {
            local_time: "unknown".to_string(),
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

impl PromptContextProvider for StaticPromptContext {
    fn prompt_context(&self, assistant_name: &str) -> PromptContext {
        PromptContext {
            assistant_name: assistant_name.to_string(),
            local_time: self.local_time.clone(),
            platform: self.platform.clone(),
        }
    }
}
