//! Phase-specific prompt context and structured results
//!
//! Each action phase needs a different slice of the session to build its
//! prompt, and produces a different shape of result. Both are modeled as
//! tagged unions so the orchestrator never passes around a bag of optional
//! fields.

use super::delegate::DelegateId;
use super::phase::DebatePhase;
use serde::{Deserialize, Serialize};

/// A policy text attributed to its delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatePolicy {
    pub delegate: DelegateId,
    pub policy: String,
}

/// A critique as seen by the delegate receiving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedCritique {
    pub from: DelegateId,
    pub message: String,
}

/// Input context for one delegate's call in one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PhaseContext {
    /// Proposals only need the scenario
    Proposal,
    /// Every other delegate's original policy
    Critique { policies: Vec<DelegatePolicy> },
    /// The delegate's own original policy and all critiques addressed to it
    Refactor {
        original_policy: String,
        critiques: Vec<ReceivedCritique>,
    },
    /// Every other delegate's most recent policy
    Vote { policies: Vec<DelegatePolicy> },
}

impl PhaseContext {
    pub fn phase(&self) -> DebatePhase {
        match self {
            PhaseContext::Proposal => DebatePhase::Proposal,
            PhaseContext::Critique { .. } => DebatePhase::Critique,
            PhaseContext::Refactor { .. } => DebatePhase::Refactor,
            PhaseContext::Vote { .. } => DebatePhase::Vote,
        }
    }
}

/// Structured result of one delegate's call in one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PhaseOutcome {
    Proposal {
        policy: String,
    },
    Critique {
        target: Option<DelegateId>,
        critique: String,
    },
    Refactor {
        policy: String,
    },
    Vote {
        vote: Option<DelegateId>,
        explanation: String,
    },
}

impl PhaseOutcome {
    pub fn phase(&self) -> DebatePhase {
        match self {
            PhaseOutcome::Proposal { .. } => DebatePhase::Proposal,
            PhaseOutcome::Critique { .. } => DebatePhase::Critique,
            PhaseOutcome::Refactor { .. } => DebatePhase::Refactor,
            PhaseOutcome::Vote { .. } => DebatePhase::Vote,
        }
    }

    /// The delegate this outcome points at, if any
    pub fn target(&self) -> Option<DelegateId> {
        match self {
            PhaseOutcome::Critique { target, .. } => *target,
            PhaseOutcome::Vote { vote, .. } => *vote,
            _ => None,
        }
    }

    /// Drop the target (used when it fails validation)
    pub fn without_target(self) -> Self {
        match self {
            PhaseOutcome::Critique { critique, .. } => PhaseOutcome::Critique {
                target: None,
                critique,
            },
            PhaseOutcome::Vote { explanation, .. } => PhaseOutcome::Vote {
                vote: None,
                explanation,
            },
            other => other,
        }
    }
}
