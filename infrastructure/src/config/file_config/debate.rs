//! Debate configuration from TOML (`[debate]` section)

use super::{ConfigIssue, ConfigValidationError};
use arena_application::{Concurrency, DebateParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw debate configuration from TOML
///
/// # Example
///
/// ```toml
/// [debate]
/// max_attempts = 3
/// attempt_timeout_secs = 30
/// backoff_step_ms = 1000
/// concurrency = "parallel"   # "parallel" or "sequential"
/// strict_targets = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_attempts: u32,
    pub attempt_timeout_secs: u64,
    pub backoff_step_ms: u64,
    pub concurrency: String,
    pub strict_targets: bool,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let params = DebateParams::default();
        Self {
            max_attempts: params.max_attempts,
            attempt_timeout_secs: params.attempt_timeout.as_secs(),
            backoff_step_ms: params.backoff_step.as_millis() as u64,
            concurrency: params.concurrency.to_string(),
            strict_targets: params.strict_targets,
        }
    }
}

impl FileDebateConfig {
    /// Parse concurrency string, falling back to parallel with a warning
    pub fn parse_concurrency(&self) -> (Concurrency, Vec<ConfigIssue>) {
        match self.concurrency.parse::<Concurrency>() {
            Ok(concurrency) => (concurrency, vec![]),
            Err(_) => (
                Concurrency::default(),
                vec![ConfigIssue::warning(ConfigValidationError::InvalidConcurrency(
                    self.concurrency.clone(),
                ))],
            ),
        }
    }

    /// Convert to orchestrator parameters
    pub fn to_debate_params(&self) -> (DebateParams, Vec<ConfigIssue>) {
        let (concurrency, issues) = self.parse_concurrency();
        let params = DebateParams::default()
            .with_max_attempts(self.max_attempts)
            .with_attempt_timeout(Duration::from_secs(self.attempt_timeout_secs))
            .with_backoff_step(Duration::from_millis(self.backoff_step_ms))
            .with_concurrency(concurrency)
            .with_strict_targets(self.strict_targets);
        (params, issues)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_attempts == 0 {
            issues.push(ConfigIssue::error(ConfigValidationError::ZeroAttempts));
        }
        if self.attempt_timeout_secs == 0 {
            issues.push(ConfigIssue::error(ConfigValidationError::ZeroTimeout));
        }
        issues.extend(self.parse_concurrency().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let (params, issues) = FileDebateConfig::default().to_debate_params();
        assert!(issues.is_empty());
        assert_eq!(params.max_attempts, 3);
        assert_eq!(params.attempt_timeout, Duration::from_secs(30));
        assert_eq!(params.backoff_step, Duration::from_secs(1));
        assert_eq!(params.concurrency, Concurrency::Parallel);
    }

    #[test]
    fn test_unknown_concurrency_falls_back() {
        let config = FileDebateConfig {
            concurrency: "swarm".to_string(),
            ..Default::default()
        };
        let (params, issues) = config.to_debate_params();
        assert_eq!(params.concurrency, Concurrency::Parallel);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message().contains("swarm"));
    }

    #[test]
    fn test_zero_attempts_is_an_error() {
        let config = FileDebateConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
