//! Retry policy for completion calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff parameters for [`call_with_retry`](crate::use_cases::retry::call_with_retry).
///
/// Attempts are numbered from 1. A transient failure on attempt `n` waits
/// `base_delay * 2^n` before attempt `n + 1`, so with the defaults the
/// waits are 8s then 16s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1).
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Add a uniform random delay in `[0, base_delay]` to every wait.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(4),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Wait after a failed `attempt` (1-based), before jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(4));
        assert!(!policy.jitter);
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(8));
        assert_eq!(policy.backoff(2), Duration::from_secs(16));
        assert_eq!(policy.backoff(3), Duration::from_secs(32));
    }

    #[test]
    fn test_max_attempts_is_at_least_one() {
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts, 1);
    }
}
