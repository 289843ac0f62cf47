//! Output configuration from TOML (`[output]` section)

use arena_domain::OutputFormat;
use serde::{Deserialize, Serialize};

// Re-export OutputFormat from domain for convenience
pub use arena_domain::OutputFormat as FileOutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress bars while phases run
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "leaderboard"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Leaderboard));
        assert!(config.output.color);
    }
}
