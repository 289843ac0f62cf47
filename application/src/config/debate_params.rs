//! Debate parameters — orchestration control.
//!
//! [`DebateParams`] groups the static parameters that control how
//! [`DebateOrchestrator`](crate::use_cases::run_phase::DebateOrchestrator)
//! drives a phase: retry ceiling, per-attempt timeout, backoff step,
//! concurrency and target validation. These are application-layer concerns,
//! not domain policy.

use crate::use_cases::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How the delegates of one phase are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concurrency {
    /// All eligible delegates are called at once (default)
    #[default]
    Parallel,
    /// Delegates are called one after another in seat order
    Sequential,
}

impl Concurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Concurrency::Parallel => "parallel",
            Concurrency::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Concurrency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" => Ok(Concurrency::Parallel),
            "sequential" => Ok(Concurrency::Sequential),
            other => Err(format!(
                "Invalid concurrency '{}': expected 'parallel' or 'sequential'",
                other
            )),
        }
    }
}

/// Orchestration control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateParams {
    /// Attempts per delegate call before the error is surfaced.
    pub max_attempts: u32,
    /// Deadline for a single attempt.
    pub attempt_timeout: Duration,
    /// Linear backoff unit: the n-th retry waits `n * backoff_step`.
    pub backoff_step: Duration,
    /// Scheduling of the delegates within a phase.
    pub concurrency: Concurrency,
    /// Drop critique/vote targets naming the caller or an inactive seat.
    pub strict_targets: bool,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            backoff_step: Duration::from_secs(1),
            concurrency: Concurrency::Parallel,
            strict_targets: true,
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_strict_targets(mut self, strict: bool) -> Self {
        self.strict_targets = strict;
        self
    }

    /// Retry policy for a single delegate call
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            attempt_timeout: self.attempt_timeout,
            backoff_step: self.backoff_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DebateParams::default();
        assert_eq!(params.max_attempts, 3);
        assert_eq!(params.attempt_timeout, Duration::from_secs(30));
        assert_eq!(params.backoff_step, Duration::from_secs(1));
        assert_eq!(params.concurrency, Concurrency::Parallel);
        assert!(params.strict_targets);
    }

    #[test]
    fn test_builder() {
        let params = DebateParams::default()
            .with_max_attempts(5)
            .with_attempt_timeout(Duration::from_secs(10))
            .with_concurrency(Concurrency::Sequential)
            .with_strict_targets(false);

        assert_eq!(params.max_attempts, 5);
        assert_eq!(params.attempt_timeout, Duration::from_secs(10));
        assert_eq!(params.concurrency, Concurrency::Sequential);
        assert!(!params.strict_targets);
    }

    #[test]
    fn test_retry_policy_mirrors_params() {
        let policy = DebateParams::default()
            .with_backoff_step(Duration::from_millis(250))
            .retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_step, Duration::from_millis(250));
    }

    #[test]
    fn test_concurrency_from_str() {
        assert_eq!("Sequential".parse::<Concurrency>().unwrap(), Concurrency::Sequential);
        assert_eq!(" parallel ".parse::<Concurrency>().unwrap(), Concurrency::Parallel);
        assert!("both".parse::<Concurrency>().is_err());
    }
}
