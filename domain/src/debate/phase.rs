//! Debate phase state machine

use serde::{Deserialize, Serialize};

/// Phase of a debate session
///
/// Phases run strictly in order:
///
/// ```text
/// setup → proposal → critique → refactor → vote → results
/// ```
///
/// `Setup` is also where [`reset`](crate::DebateSession::reset) returns to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebatePhase {
    #[default]
    Setup,
    Proposal,
    Critique,
    Refactor,
    Vote,
    Results,
}

impl DebatePhase {
    /// The four phases in which delegates call their model
    pub const ACTIONS: [DebatePhase; 4] = [
        DebatePhase::Proposal,
        DebatePhase::Critique,
        DebatePhase::Refactor,
        DebatePhase::Vote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebatePhase::Setup => "setup",
            DebatePhase::Proposal => "proposal",
            DebatePhase::Critique => "critique",
            DebatePhase::Refactor => "refactor",
            DebatePhase::Vote => "vote",
            DebatePhase::Results => "results",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DebatePhase::Setup => "Setup",
            DebatePhase::Proposal => "Policy Proposals",
            DebatePhase::Critique => "Critiques",
            DebatePhase::Refactor => "Refactored Policies",
            DebatePhase::Vote => "Voting",
            DebatePhase::Results => "Results",
        }
    }

    /// The phase that follows this one, or `None` after results
    pub fn next(&self) -> Option<DebatePhase> {
        match self {
            DebatePhase::Setup => Some(DebatePhase::Proposal),
            DebatePhase::Proposal => Some(DebatePhase::Critique),
            DebatePhase::Critique => Some(DebatePhase::Refactor),
            DebatePhase::Refactor => Some(DebatePhase::Vote),
            DebatePhase::Vote => Some(DebatePhase::Results),
            DebatePhase::Results => None,
        }
    }

    /// Whether delegates produce an artifact in this phase
    pub fn is_action_phase(&self) -> bool {
        Self::ACTIONS.contains(self)
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DebatePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "setup" => Ok(DebatePhase::Setup),
            "proposal" => Ok(DebatePhase::Proposal),
            "critique" => Ok(DebatePhase::Critique),
            "refactor" => Ok(DebatePhase::Refactor),
            "vote" => Ok(DebatePhase::Vote),
            "results" => Ok(DebatePhase::Results),
            other => Err(format!(
                "Unknown phase: {}. Valid: setup, proposal, critique, refactor, vote, results",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order() {
        let mut phase = DebatePhase::Setup;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            assert!(next > phase);
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(phase, DebatePhase::Results);
    }

    #[test]
    fn test_action_phases() {
        assert!(!DebatePhase::Setup.is_action_phase());
        assert!(DebatePhase::Refactor.is_action_phase());
        assert!(!DebatePhase::Results.is_action_phase());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Vote".parse::<DebatePhase>(), Ok(DebatePhase::Vote));
        assert!("debate".parse::<DebatePhase>().is_err());
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&DebatePhase::Critique).unwrap();
        assert_eq!(json, "\"critique\"");
    }
}
