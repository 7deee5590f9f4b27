//! Retry/backoff controller for completion calls.
//!
//! Only model completions go through here. Tool execution is never retried
//! since tool side effects may not be idempotent.

use crate::config::RetryPolicy;
use crate::ports::completion_gateway::GatewayError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Run `op` until it succeeds, fails fatally, or attempts run out.
///
/// `on_retry(attempt, delay, error)` fires before each sleep, with the
/// 1-based number of the attempt that just failed.
pub async fn call_with_retry<T, F, Fut, R>(
    policy: &RetryPolicy,
    mut on_retry: R,
    mut op: F,
) -> Result<T, GatewayError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
    R: FnMut(u32, Duration, &GatewayError),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Completion succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = backoff_delay(policy, attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient completion error, retrying"
                );
                on_retry(attempt, delay, &e);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(attempt, error = %e, "Retries exhausted");
                }
                return Err(e);
            }
        }
    }
}

fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let delay = policy.backoff(attempt);
    if !policy.jitter {
        return delay;
    }
    let base_ms = u64::try_from(policy.base_delay.as_millis()).unwrap_or(u64::MAX);
    let jitter_ms = rand::rng().random_range(0..=base_ms);
    delay.saturating_add(Duration::from_millis(jitter_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn rate_limited() -> GatewayError {
        GatewayError::RateLimited("429 Too Many Requests".into())
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_transient_calls_max_attempts() {
        let calls = Mutex::new(0u32);
        let policy = RetryPolicy::default();

        let result: Result<(), _> = call_with_retry(
            &policy,
            |_, _, _| {},
            |_| {
                *calls.lock().unwrap() += 1;
                async { Err(rate_limited()) }
            },
        )
        .await;

        assert_eq!(result, Err(rate_limited()));
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_second_attempt_stops() {
        let calls = Mutex::new(0u32);
        let policy = RetryPolicy::default();

        let result = call_with_retry(
            &policy,
            |_, _, _| {},
            |attempt| {
                *calls.lock().unwrap() += 1;
                async move {
                    if attempt == 1 {
                        Err(GatewayError::Timeout)
                    } else {
                        Ok("done")
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_is_not_retried() {
        let calls = Mutex::new(0u32);

        let result: Result<(), _> = call_with_retry(
            &RetryPolicy::default(),
            |_, _, _| {},
            |_| {
                *calls.lock().unwrap() += 1;
                async { Err(GatewayError::InvalidResponse("no choices".into())) }
            },
        )
        .await;

        assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_eight_then_sixteen_seconds() {
        let delays = Mutex::new(Vec::new());
        let start = Instant::now();

        let result = call_with_retry(
            &RetryPolicy::default(),
            |attempt, delay, _| delays.lock().unwrap().push((attempt, delay)),
            |attempt| async move {
                if attempt < 3 {
                    Err(rate_limited())
                } else {
                    Ok(attempt)
                }
            },
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(start.elapsed(), Duration::from_secs(24));
        assert_eq!(
            *delays.lock().unwrap(),
            vec![(1, Duration::from_secs(8)), (2, Duration::from_secs(16))]
        );
    }

    #[test]
    fn test_jitter_is_bounded_by_base_delay() {
        let policy = RetryPolicy::default().with_jitter(true);
        for _ in 0..50 {
            let delay = backoff_delay(&policy, 1);
            assert!(delay >= Duration::from_secs(8));
            assert!(delay <= Duration::from_secs(12));
        }
    }
}
