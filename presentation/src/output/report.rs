//! Serializable view of a finished debate

use arena_domain::{
    ActivityLogEntry, CallStatistic, DebatePhase, DebateSession, Delegate, DelegateId,
    ModelPerformance, VoteTally,
};
use serde::Serialize;

/// Everything a consumer of `--output json` needs, derived views included
#[derive(Debug, Serialize)]
pub struct DebateReport<'a> {
    pub scenario: &'a str,
    pub phase: DebatePhase,
    /// Seated delegates only
    pub delegates: Vec<&'a Delegate>,
    pub tally: VoteTally,
    pub winner: Option<DelegateId>,
    pub leaderboard: Vec<ModelPerformance>,
    pub activity: &'a [ActivityLogEntry],
    pub stats: &'a [CallStatistic],
}

impl<'a> DebateReport<'a> {
    pub fn from_session(session: &'a DebateSession) -> Self {
        Self {
            scenario: session.scenario(),
            phase: session.phase(),
            delegates: session.active_delegates().collect(),
            tally: session.tally(),
            winner: session.winner(),
            leaderboard: session.performance(),
            activity: session.activity_log(),
            stats: session.call_stats(),
        }
    }
}
