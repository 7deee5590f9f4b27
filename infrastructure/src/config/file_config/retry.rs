//! Retry configuration from TOML (`[retry]` section)

use super::model::out_of_range;
use relay_application::RetryPolicy;
use relay_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// ```toml
/// [retry]
/// max_attempts = 3
/// base_delay_secs = 4.0
/// jitter = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub base_delay_secs: f64,
    pub jitter: bool,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_secs: policy.base_delay.as_secs_f64(),
            jitter: policy.jitter,
        }
    }
}

impl FileRetryConfig {
    pub fn to_retry_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let defaults = RetryPolicy::default();
        let mut issues = Vec::new();

        if self.max_attempts == 0 {
            issues.push(out_of_range(
                "retry.max_attempts",
                "retry.max_attempts must be at least 1, using 1",
            ));
        }

        let base_delay = match Duration::try_from_secs_f64(self.base_delay_secs) {
            Ok(delay) => delay,
            Err(_) => {
                issues.push(out_of_range(
                    "retry.base_delay_secs",
                    format!(
                        "retry.base_delay_secs: {} is not a valid delay, falling back to {}",
                        self.base_delay_secs,
                        defaults.base_delay.as_secs_f64()
                    ),
                ));
                defaults.base_delay
            }
        };

        let policy = defaults
            .with_max_attempts(self.max_attempts)
            .with_base_delay(base_delay)
            .with_jitter(self.jitter);
        (policy, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let (policy, issues) = FileRetryConfig::default().to_retry_policy();
        assert!(issues.is_empty());
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_invalid_values() {
        let config = FileRetryConfig {
            max_attempts: 0,
            base_delay_secs: -1.0,
            jitter: true,
        };
        let (policy, issues) = config.to_retry_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_secs(4));
        assert!(policy.jitter);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_fractional_delay() {
        let config = FileRetryConfig {
            base_delay_secs: 0.5,
            ..Default::default()
        };
        assert_eq!(
            config.to_retry_policy().0.base_delay,
            Duration::from_millis(500)
        );
    }
}
