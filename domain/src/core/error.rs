//! Domain error types

use crate::debate::phase::DebatePhase;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: DebatePhase, to: DebatePhase },

    #[error("Phase {0} has no delegate action")]
    NotAnActionPhase(DebatePhase),

    #[error("Unknown delegate: {0}")]
    UnknownDelegate(String),

    #[error("Invalid delegate id: {0}")]
    InvalidDelegateId(String),

    #[error("Delegate {0} has no model assigned")]
    InactiveDelegate(String),

    #[error("Scenario must not be empty")]
    EmptyScenario,

    #[error("No delegates have a model assigned")]
    NoActiveDelegates,
}

impl DomainError {
    /// Check if this error came from the phase state machine
    pub fn is_transition_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidTransition { .. } | DomainError::NotAnActionPhase(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: DebatePhase::Setup,
            to: DebatePhase::Vote,
        };
        assert_eq!(error.to_string(), "Invalid phase transition: setup -> vote");
    }

    #[test]
    fn test_is_transition_error() {
        assert!(DomainError::NotAnActionPhase(DebatePhase::Results).is_transition_error());
        assert!(!DomainError::EmptyScenario.is_transition_error());
        assert!(!DomainError::NoActiveDelegates.is_transition_error());
    }
}
