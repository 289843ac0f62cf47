//! Per-model performance record

use crate::core::model::ModelId;
use crate::debate::delegate::DelegateId;
use serde::Serialize;

/// Weight of the vote component in the final score
pub const VOTE_WEIGHT: f64 = 40.0;
/// Weight of the participation component
pub const PARTICIPATION_WEIGHT: f64 = 20.0;
/// Weight (and cap) of the policy-length quality component
pub const QUALITY_WEIGHT: f64 = 20.0;
/// Weight of the speed component; also the default for untimed models
pub const SPEED_WEIGHT: f64 = 20.0;
/// Mean policy length (characters) that earns the full quality score
pub const QUALITY_TARGET_CHARS: f64 = 200.0;

/// Aggregated performance of one model across every seat it occupies
///
/// Derived on demand from the session; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPerformance {
    pub model: ModelId,
    pub provider: String,
    pub seats: Vec<DelegateId>,
    pub votes_received: usize,
    /// Sum of positive call durations (ms)
    pub total_duration_ms: f64,
    /// `total_duration_ms` over all calls, timed or not
    pub avg_duration_ms: f64,
    pub call_count: usize,
    pub total_tokens: u64,
    /// Raw participation count summed over seats (0-4 per seat)
    pub participation: u32,
    /// Mean length of non-empty original policies
    pub avg_policy_chars: f64,
    pub vote_score: f64,
    pub participation_score: f64,
    pub quality_score: f64,
    pub speed_score: f64,
    pub final_score: f64,
    /// 1-based position after sorting by final score
    pub rank: usize,
}

impl ModelPerformance {
    pub(crate) fn new(model: ModelId) -> Self {
        let provider = model.provider().to_string();
        Self {
            model,
            provider,
            seats: Vec::new(),
            votes_received: 0,
            total_duration_ms: 0.0,
            avg_duration_ms: 0.0,
            call_count: 0,
            total_tokens: 0,
            participation: 0,
            avg_policy_chars: 0.0,
            vote_score: 0.0,
            participation_score: 0.0,
            quality_score: 0.0,
            speed_score: 0.0,
            final_score: 0.0,
            rank: 0,
        }
    }

    /// Whether any of this model's calls carried a duration
    pub fn is_timed(&self) -> bool {
        self.avg_duration_ms > 0.0
    }
}
