//! Delegate (seat) entity and its artifacts

use super::phase::DebatePhase;
use crate::core::error::DomainError;
use crate::core::model::ModelId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of seats at the table
pub const MAX_DELEGATES: u8 = 6;

/// Stable seat identifier: `D1` .. `D6` (Value Object)
///
/// # Example
///
/// ```
/// use arena_domain::DelegateId;
///
/// let id: DelegateId = "d3".parse().unwrap();
/// assert_eq!(id.to_string(), "D3");
/// assert!("D7".parse::<DelegateId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelegateId(u8);

impl DelegateId {
    /// Create an id from its seat number (1-based)
    pub fn new(seat: u8) -> Result<Self, DomainError> {
        if (1..=MAX_DELEGATES).contains(&seat) {
            Ok(Self(seat))
        } else {
            Err(DomainError::InvalidDelegateId(format!("D{}", seat)))
        }
    }

    pub fn seat(&self) -> u8 {
        self.0
    }

    /// All seat ids in table order
    pub fn all() -> impl Iterator<Item = DelegateId> {
        (1..=MAX_DELEGATES).map(DelegateId)
    }
}

impl std::fmt::Display for DelegateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}", self.0)
    }
}

impl std::str::FromStr for DelegateId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let seat = trimmed
            .strip_prefix(['D', 'd'])
            .and_then(|n| n.parse::<u8>().ok())
            .ok_or_else(|| DomainError::InvalidDelegateId(trimmed.to_string()))?;
        DelegateId::new(seat).map_err(|_| DomainError::InvalidDelegateId(trimmed.to_string()))
    }
}

impl Serialize for DelegateId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DelegateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A critique issued by a delegate during the critique phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    /// Delegate whose policy is critiqued (`None` when the response named nobody)
    pub target: Option<DelegateId>,
    pub message: String,
}

/// A vote cast by a delegate during the vote phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Delegate voted for (`None` when the response named nobody)
    pub target: Option<DelegateId>,
    pub explanation: Option<String>,
}

/// One debate participant slot (Entity)
///
/// Invariant: a delegate without a model has no artifacts and is never busy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegate {
    pub id: DelegateId,
    pub name: String,
    pub model: ModelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refactored_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critique: Option<Critique>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ballot: Option<Ballot>,
    /// Phase the delegate is currently calling its model in
    #[serde(skip)]
    pub busy: Option<DebatePhase>,
}

impl Delegate {
    pub fn new(id: DelegateId) -> Self {
        Self {
            id,
            name: format!("Delegate {}", id.seat()),
            model: ModelId::unassigned(),
            policy: None,
            refactored_policy: None,
            critique: None,
            ballot: None,
            busy: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.model.is_unassigned()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Whether this delegate has cast a vote naming somebody
    pub fn has_voted(&self) -> bool {
        self.voted_for().is_some()
    }

    pub fn voted_for(&self) -> Option<DelegateId> {
        self.ballot.as_ref().and_then(|b| b.target)
    }

    /// The most recent policy: refactored if present, else the original
    pub fn latest_policy(&self) -> Option<&str> {
        self.refactored_policy
            .as_deref()
            .or(self.policy.as_deref())
            .filter(|p| !p.is_empty())
    }

    /// Participation count (0-4): policy, critique, refactored policy, vote
    pub fn participation(&self) -> u32 {
        [
            self.policy.as_ref().is_some_and(|p| !p.is_empty()),
            self.critique.is_some(),
            self.refactored_policy.as_ref().is_some_and(|p| !p.is_empty()),
            self.has_voted(),
        ]
        .into_iter()
        .filter(|b| *b)
        .count() as u32
    }

    /// Wipe all phase artifacts and the busy flag; id, name and model stay
    pub fn clear_artifacts(&mut self) {
        self.policy = None;
        self.refactored_policy = None;
        self.critique = None;
        self.ballot = None;
        self.busy = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> DelegateId {
        DelegateId::new(n).unwrap()
    }

    #[test]
    fn test_delegate_id_parse() {
        assert_eq!("D1".parse::<DelegateId>().unwrap(), id(1));
        assert_eq!(" d6 ".parse::<DelegateId>().unwrap(), id(6));
        assert!("D0".parse::<DelegateId>().is_err());
        assert!("X2".parse::<DelegateId>().is_err());
        assert!("D".parse::<DelegateId>().is_err());
    }

    #[test]
    fn test_all_ids() {
        let ids: Vec<String> = DelegateId::all().map(|d| d.to_string()).collect();
        assert_eq!(ids, vec!["D1", "D2", "D3", "D4", "D5", "D6"]);
    }

    #[test]
    fn test_new_delegate_is_inactive() {
        let delegate = Delegate::new(id(4));
        assert_eq!(delegate.name, "Delegate 4");
        assert!(!delegate.is_active());
        assert_eq!(delegate.participation(), 0);
    }

    #[test]
    fn test_latest_policy_prefers_refactored() {
        let mut delegate = Delegate::new(id(1));
        delegate.policy = Some("original".to_string());
        assert_eq!(delegate.latest_policy(), Some("original"));
        delegate.refactored_policy = Some("refined".to_string());
        assert_eq!(delegate.latest_policy(), Some("refined"));
    }

    #[test]
    fn test_participation_counts_each_artifact() {
        let mut delegate = Delegate::new(id(1));
        delegate.policy = Some("p".to_string());
        delegate.critique = Some(Critique {
            target: None,
            message: "hmm".to_string(),
        });
        assert_eq!(delegate.participation(), 2);

        // A ballot naming nobody is not a cast vote
        delegate.ballot = Some(Ballot {
            target: None,
            explanation: None,
        });
        assert_eq!(delegate.participation(), 2);

        delegate.ballot = Some(Ballot {
            target: Some(id(2)),
            explanation: None,
        });
        delegate.refactored_policy = Some("r".to_string());
        assert_eq!(delegate.participation(), 4);
    }

    #[test]
    fn test_clear_artifacts_keeps_identity() {
        let mut delegate = Delegate::new(id(2));
        delegate.model = ModelId::new("openai/gpt-5");
        delegate.policy = Some("p".to_string());
        delegate.busy = Some(DebatePhase::Proposal);
        delegate.clear_artifacts();
        assert_eq!(delegate.model.as_str(), "openai/gpt-5");
        assert!(delegate.policy.is_none());
        assert!(!delegate.is_busy());
    }
}
