//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod debate;
mod gateway;
mod output;
mod seats;

pub use debate::FileDebateConfig;
pub use gateway::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileGatewayConfig};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use seats::FileSeatsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("debate.max_attempts cannot be 0")]
    ZeroAttempts,

    #[error("debate.attempt_timeout_secs cannot be 0")]
    ZeroTimeout,

    #[error("debate.concurrency: unknown value '{0}', falling back to 'parallel'")]
    InvalidConcurrency(String),

    #[error("seats: '{0}' is not a seat (expected D1 to D6)")]
    UnknownSeat(String),

    #[error("seats.{seat}: model '{model}' should look like '<provider>/<model-name>'")]
    InvalidModel { seat: String, model: String },

    #[error("gateway.base_url: '{0}' is not an http(s) URL")]
    InvalidBaseUrl(String),
}

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Usable, a fallback applies
    Warning,
    /// The configuration cannot be used as-is
    Error,
}

/// One problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigValidationError,
}

impl ConfigIssue {
    pub fn warning(code: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Warning,
            code,
        }
    }

    pub fn error(code: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Error,
            code,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn message(&self) -> String {
        self.code.to_string()
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// AI gateway endpoint and credential source
    pub gateway: FileGatewayConfig,
    /// Retry, timeout and scheduling
    pub debate: FileDebateConfig,
    /// Seat to model assignments
    pub seats: FileSeatsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let base_url = self.gateway.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(ConfigValidationError::InvalidBaseUrl(
                self.gateway.base_url.clone(),
            )));
        }

        issues.extend(self.debate.validate());
        issues.extend(self.seats.parse_seats().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gateway]
base_url = "https://ai-gateway.vercel.sh/v1"
api_key_env = "ARENA_KEY"

[debate]
max_attempts = 5
attempt_timeout_secs = 45
concurrency = "sequential"
strict_targets = false

[seats]
D1 = "openai/gpt-5.1"
D2 = "anthropic/claude-sonnet-4.5"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.api_key_env, "ARENA_KEY");
        assert_eq!(config.debate.max_attempts, 5);
        assert_eq!(config.debate.attempt_timeout_secs, 45);
        assert_eq!(config.debate.backoff_step_ms, 1000);
        assert!(!config.debate.strict_targets);
        assert_eq!(config.seats.0.len(), 2);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[seats]
D3 = "xai/grok-4"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway, FileGatewayConfig::default());
        assert_eq!(config.debate, FileDebateConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.seats.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[gateway]
base_url = "ftp://example.com"

[debate]
attempt_timeout_secs = 0
concurrency = "turbo"

[seats]
D9 = "openai/gpt-5"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 3);
        assert!(issues.contains(&ConfigIssue::error(ConfigValidationError::ZeroTimeout)));
    }
}
