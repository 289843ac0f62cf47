//! Response parsing for debate phases.
//!
//! These functions extract structured decisions from free-form model
//! responses. They are pure domain logic — no I/O, no validation against
//! the roster, just text pattern matching.
//!
//! # Convention
//!
//! Models are asked to put the delegate id on the first line and their
//! reasoning on the following lines. Only the first line is scanned.
//!
//! | Function | Phase | Extracts |
//! |----------|-------|----------|
//! | [`parse_proposal`] | proposal / refactor | trimmed policy text |
//! | [`parse_critique`] | critique | target id + critique message |
//! | [`parse_vote`] | vote | voted id + explanation |
//!
//! A response without an id on line 1 is not an error: the target is simply
//! `None` and the message falls back to the whole trimmed text.

use super::context::PhaseOutcome;
use super::delegate::{DelegateId, MAX_DELEGATES};
use super::phase::DebatePhase;
use crate::core::error::DomainError;
use regex::Regex;
use std::sync::LazyLock;

static DELEGATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)D[1-{}]", MAX_DELEGATES)).expect("delegate id pattern is valid")
});

/// A target id (possibly missing) plus the accompanying text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedText {
    pub target: Option<DelegateId>,
    pub text: String,
}

/// Parse a proposal or refactor response: the whole trimmed text is the policy.
pub fn parse_proposal(response: &str) -> String {
    response.trim().to_string()
}

/// Parse a critique response.
///
/// # Examples
///
/// ```
/// use arena_domain::debate::parsing::parse_critique;
///
/// let parsed = parse_critique("D2\nToo vague, lacks specifics.");
/// assert_eq!(parsed.target.unwrap().to_string(), "D2");
/// assert_eq!(parsed.text, "Too vague, lacks specifics.");
///
/// let parsed = parse_critique("d3 is weak");
/// assert_eq!(parsed.target.unwrap().to_string(), "D3");
/// assert_eq!(parsed.text, "d3 is weak");
/// ```
pub fn parse_critique(response: &str) -> TargetedText {
    parse_targeted(response)
}

/// Parse a vote response. Same shape as [`parse_critique`].
pub fn parse_vote(response: &str) -> TargetedText {
    parse_targeted(response)
}

/// Parse a response for the given action phase into a [`PhaseOutcome`].
pub fn parse_phase_response(phase: DebatePhase, response: &str) -> Result<PhaseOutcome, DomainError> {
    match phase {
        DebatePhase::Proposal => Ok(PhaseOutcome::Proposal {
            policy: parse_proposal(response),
        }),
        DebatePhase::Critique => {
            let parsed = parse_critique(response);
            Ok(PhaseOutcome::Critique {
                target: parsed.target,
                critique: parsed.text,
            })
        }
        DebatePhase::Refactor => Ok(PhaseOutcome::Refactor {
            policy: parse_proposal(response),
        }),
        DebatePhase::Vote => {
            let parsed = parse_vote(response);
            Ok(PhaseOutcome::Vote {
                vote: parsed.target,
                explanation: parsed.text,
            })
        }
        other => Err(DomainError::NotAnActionPhase(other)),
    }
}

fn parse_targeted(response: &str) -> TargetedText {
    let trimmed = response.trim();
    let mut lines = trimmed.lines();

    let target = lines
        .next()
        .and_then(|first| DELEGATE_PATTERN.find(first))
        .and_then(|m| m.as_str().to_uppercase().parse::<DelegateId>().ok());

    let rest = lines.collect::<Vec<_>>().join("\n");
    let rest = rest.trim();
    let text = if rest.is_empty() { trimmed } else { rest };

    TargetedText {
        target,
        text: text.to_string(),
    }
}
