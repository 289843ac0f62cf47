//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for debate results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full transcript: proposals, critiques, refactors, votes and ranking (default)
    #[default]
    Full,
    /// Winner and model ranking only
    Leaderboard,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full() {
        assert_eq!(OutputFormat::default(), OutputFormat::Full);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Leaderboard).unwrap();
        assert_eq!(json, "\"leaderboard\"");
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
