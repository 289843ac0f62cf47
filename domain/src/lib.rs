//! Domain layer for gov-arena
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Up to six delegates, each backed by a language model, debate a policy
//! scenario in four action phases: proposal, critique, refactor and vote.
//!
//! ## Session
//!
//! A [`DebateSession`] owns every piece of mutable state. The vote tally,
//! the winner and the model ranking are pure functions of it.
//!
//! ## Scoring
//!
//! [`scoring::score_models`] ranks the participating models on votes,
//! participation, policy length and speed.

pub mod config;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod scoring;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, model::ModelId};
pub use debate::{
    ActivityLogEntry, Ballot, CallStatistic, Critique, DebatePhase, DebateSession, Delegate,
    DelegateId, DelegatePolicy, LogCategory, MAX_DELEGATES, PhaseContext, PhaseOutcome,
    ReceivedCritique, VoteTally, parse_critique, parse_phase_response, parse_proposal, parse_vote,
};
pub use prompt::{Message, PromptTemplate, Role};
pub use scoring::{ModelPerformance, score_models};
