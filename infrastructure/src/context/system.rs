use chrono::Local;
use relay_application::ports::prompt_context::PromptContextProvider;
use relay_domain::PromptContext;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Reads the local time on every call, so each turn sees a fresh clock.
#[derive(Debug, Clone, Default)]
pub struct SystemPromptContext;

impl SystemPromptContext {
    pub fn new() -> Self {
        Self
    }
}

impl PromptContextProvider for SystemPromptContext {
    fn prompt_context(&self, assistant_name: &str) -> PromptContext {
        PromptContext {
            assistant_name: assistant_name.to_string(),
            local_time: Local::now().format(TIME_FORMAT).to_string(),
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_context() {
        let ctx = SystemPromptContext::new().prompt_context("Relay");
        assert_eq!(ctx.assistant_name, "Relay");
        assert!(ctx.platform.starts_with(std::env::consts::OS));
        // "YYYY-MM-DD HH:MM:SS ..."
        assert_eq!(&ctx.local_time[4..5], "-");
    }
}
