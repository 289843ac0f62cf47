//! Resilient call wrapper
//!
//! Runs a unit of work against a per-attempt deadline and retries it with a
//! linear backoff. Every failure is retried the same way: a timeout and a
//! provider error are indistinguishable to the retry loop.

use crate::ports::generation::GatewayError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Why a call failed after its last attempt
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("Attempt timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error(transparent)]
    Provider(#[from] GatewayError),
}

impl CallError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CallError::Timeout(_))
    }
}

/// Attempt ceiling, per-attempt deadline and backoff unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait before the retry that follows `failed_attempts` failures (1-based)
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        self.backoff_step * failed_attempts
    }

    /// Attempts actually made; zero is treated as one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `op` until it succeeds or the policy's attempts are spent.
///
/// `on_retry(failed_attempts, &error)` is called before each backoff sleep.
/// No sleep follows the final attempt; its error is returned as-is.
pub async fn call_with_retry<T, F, Fut, R>(
    policy: &RetryPolicy,
    mut on_retry: R,
    mut op: F,
) -> Result<T, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
    R: FnMut(u32, &CallError),
{
    let max_attempts = policy.attempts();
    let mut failed = 0;

    loop {
        let error = match tokio::time::timeout(policy.attempt_timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => CallError::Provider(e),
            Err(_) => CallError::Timeout(policy.attempt_timeout),
        };

        failed += 1;
        if failed >= max_attempts {
            return Err(error);
        }

        let delay = policy.backoff(failed);
        warn!(
            "Attempt {}/{} failed: {}; retrying in {:?}",
            failed, max_attempts, error, delay
        );
        on_retry(failed, &error);
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn flaky(failures: u32, calls: &AtomicU32) -> impl Future<Output = Result<u32, GatewayError>> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < failures {
                Err(GatewayError::Connection(format!("attempt {}", n + 1)))
            } else {
                Ok(n + 1)
            }
        }
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_one_plus_two_seconds() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result =
            call_with_retry(&RetryPolicy::default(), |_, _| {}, || flaky(2, &calls)).await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_stops_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result =
            call_with_retry(&RetryPolicy::default(), |_, _| {}, || flaky(u32::MAX, &calls)).await;

        assert_eq!(
            result,
            Err(CallError::Provider(GatewayError::Connection(
                "attempt 3".to_string()
            )))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No backoff after the last attempt
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), CallError> = call_with_retry(
            &RetryPolicy::default(),
            |_, _| {},
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }
            },
        )
        .await;

        assert_eq!(result, Err(CallError::Timeout(Duration::from_secs(30))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(30 + 1 + 30 + 2 + 30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_retry_sees_each_failure() {
        let calls = AtomicU32::new(0);
        let mut seen = Vec::new();

        let result = call_with_retry(
            &RetryPolicy::default(),
            |failed, error| seen.push((failed, error.is_timeout())),
            || flaky(2, &calls),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(seen, vec![(1, false), (2, false)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_attempts: 0,
            ..Default::default()
        };

        let result = call_with_retry(&policy, |_, _| {}, || flaky(0, &calls)).await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
