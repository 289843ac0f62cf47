//! Debate domain
//!
//! Delegates propose, critique, refactor and vote on policies for a scenario.
//!
//! # Lifecycle
//!
//! ```text
//! ┌───────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────┐   ┌─────────┐
//! │ setup │ → │ proposal │ → │ critique │ → │ refactor │ → │ vote │ → │ results │
//! └───────┘   └──────────┘   └──────────┘   └──────────┘   └──────┘   └─────────┘
//!     ↑                                                                    │
//!     └──────────────────────────── reset ─────────────────────────────────┘
//! ```
//!
//! All state lives in a [`DebateSession`](session::DebateSession); tallies,
//! winners and rankings are derived from it on demand.

pub mod activity;
pub mod context;
pub mod delegate;
pub mod parsing;
pub mod phase;
pub mod session;
pub mod stats;
pub mod tally;

pub use activity::{ActivityLogEntry, LogCategory};
pub use context::{DelegatePolicy, PhaseContext, PhaseOutcome, ReceivedCritique};
pub use delegate::{Ballot, Critique, Delegate, DelegateId, MAX_DELEGATES};
pub use parsing::{TargetedText, parse_critique, parse_phase_response, parse_proposal, parse_vote};
pub use phase::DebatePhase;
pub use session::DebateSession;
pub use stats::CallStatistic;
pub use tally::VoteTally;
