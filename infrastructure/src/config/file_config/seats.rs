//! Seat assignments from TOML (`[seats]` section)

use super::{ConfigIssue, ConfigValidationError};
use arena_domain::{DelegateId, ModelId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw seat table: delegate id to model id
///
/// # Example
///
/// ```toml
/// [seats]
/// D1 = "openai/gpt-5.1"
/// D2 = "anthropic/claude-sonnet-4.5"
/// D3 = "google/gemini-3-pro-preview"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSeatsConfig(pub BTreeMap<String, String>);

impl FileSeatsConfig {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the table, skipping entries that name no valid seat
    pub fn parse_seats(&self) -> (Vec<(DelegateId, ModelId)>, Vec<ConfigIssue>) {
        let mut seats = Vec::new();
        let mut issues = Vec::new();

        for (key, model) in &self.0 {
            let Ok(id) = key.parse::<DelegateId>() else {
                issues.push(ConfigIssue::error(ConfigValidationError::UnknownSeat(
                    key.clone(),
                )));
                continue;
            };
            let model = ModelId::new(model.as_str());
            if !model.is_unassigned() && !model.as_str().contains('/') {
                issues.push(ConfigIssue::warning(ConfigValidationError::InvalidModel {
                    seat: id.to_string(),
                    model: model.to_string(),
                }));
            }
            seats.push((id, model));
        }

        seats.sort_by_key(|(id, _)| *id);
        (seats, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(entries: &[(&str, &str)]) -> FileSeatsConfig {
        FileSeatsConfig(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_parse_seats_case_insensitive() {
        let (parsed, issues) = seats(&[("d2", "openai/gpt-5"), ("D1", "xai/grok-4")]).parse_seats();
        assert!(issues.is_empty());
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].0.to_string(), "D1");
        assert_eq!(parsed[1].1.as_str(), "openai/gpt-5");
    }

    #[test]
    fn test_unknown_seat_is_reported() {
        let (parsed, issues) = seats(&[("D7", "openai/gpt-5")]).parse_seats();
        assert!(parsed.is_empty());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_model_without_provider_warns() {
        let (parsed, issues) = seats(&[("D1", "gpt-5")]).parse_seats();
        assert_eq!(parsed.len(), 1);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
