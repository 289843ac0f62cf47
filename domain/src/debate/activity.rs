//! Activity log entries

use super::delegate::DelegateId;
use crate::core::current_timestamp;
use serde::{Deserialize, Serialize};

/// Category tag of an activity log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Proposal,
    Critique,
    Question,
    Vote,
    Result,
    System,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Proposal => "proposal",
            LogCategory::Critique => "critique",
            LogCategory::Question => "question",
            LogCategory::Vote => "vote",
            LogCategory::Result => "result",
            LogCategory::System => "system",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notable event in the debate (append-only within a session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Milliseconds since epoch
    pub timestamp: u64,
    pub category: LogCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DelegateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<DelegateId>,
    pub message: String,
}

impl ActivityLogEntry {
    pub fn new(category: LogCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp(),
            category,
            source: None,
            target: None,
            message: message.into(),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::new(LogCategory::System, message)
    }

    pub fn from_delegate(mut self, source: DelegateId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn targeting(mut self, target: Option<DelegateId>) -> Self {
        self.target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let d1 = DelegateId::new(1).unwrap();
        let d2 = DelegateId::new(2).unwrap();
        let entry = ActivityLogEntry::new(LogCategory::Critique, "Too vague")
            .from_delegate(d1)
            .targeting(Some(d2));
        assert_eq!(entry.source, Some(d1));
        assert_eq!(entry.target, Some(d2));
        assert!(entry.timestamp > 0);
    }

    #[test]
    fn test_serialize_skips_missing_delegates() {
        let entry = ActivityLogEntry::system("Debate started");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["category"], "system");
        assert!(json.get("source").is_none());
    }
}
