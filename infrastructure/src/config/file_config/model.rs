//! Model configuration from TOML (`[model]` section)

use crate::providers::OpenAiCompatConfig;
use relay_application::SamplingParams;
use relay_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// name = "gemini-2.0-flash"
/// display_name = "Relay"
/// base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
/// api_key_env = "GEMINI_API_KEY"
/// temperature = 0.25
/// max_tokens = 8192
/// request_timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Provider model identifier
    pub name: String,
    /// Assistant name shown to the model and the user
    pub display_name: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub seed: Option<u64>,
    pub request_timeout_secs: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        let sampling = SamplingParams::default();
        Self {
            name: "gemini-2.0-flash".to_string(),
            display_name: "Relay".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            seed: sampling.seed,
            request_timeout_secs: 120,
        }
    }
}

impl FileModelConfig {
    /// Sampling parameters; out-of-range values are dropped with a warning.
    pub fn to_sampling(&self) -> (SamplingParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let temperature = self.temperature.filter(|t| {
            let ok = (0.0..=2.0).contains(t);
            if !ok {
                issues.push(out_of_range(
                    "model.temperature",
                    format!("model.temperature: {} is outside 0.0..=2.0, ignoring", t),
                ));
            }
            ok
        });
        let top_p = self.top_p.filter(|p| {
            let ok = *p > 0.0 && *p <= 1.0;
            if !ok {
                issues.push(out_of_range(
                    "model.top_p",
                    format!("model.top_p: {} is outside (0.0, 1.0], ignoring", p),
                ));
            }
            ok
        });
        let max_tokens = self.max_tokens.filter(|n| {
            if *n == 0 {
                issues.push(out_of_range(
                    "model.max_tokens",
                    "model.max_tokens must be at least 1, ignoring",
                ));
            }
            *n > 0
        });

        let sampling = SamplingParams {
            temperature,
            top_p,
            max_tokens,
            seed: self.seed,
        };
        (sampling, issues)
    }

    /// Gateway settings; the API key is read from `api_key_env`.
    pub fn gateway_config(&self) -> OpenAiCompatConfig {
        let mut config = OpenAiCompatConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs.max(1)));
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.is_empty()
        {
            config = config.with_api_key(key);
        }
        config
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_sampling().1;
        if self.name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::Empty {
                    field: "model.name".to_string(),
                },
                "model.name must not be empty",
            ));
        }
        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::Empty {
                    field: "model.base_url".to_string(),
                },
                "model.base_url must not be empty",
            ));
        }
        issues
    }
}

pub(super) fn out_of_range(field: &str, message: impl Into<String>) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
        },
        message,
    )
}
