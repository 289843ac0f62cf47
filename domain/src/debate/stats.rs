//! Call statistics — one record per completed generation call

use super::delegate::DelegateId;
use super::phase::DebatePhase;
use crate::core::current_timestamp;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// Measurement of one external generation call (immutable once recorded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStatistic {
    /// Milliseconds since epoch
    pub timestamp: u64,
    pub model: ModelId,
    /// Provider part of the model id (before the first `/`)
    pub provider: String,
    pub phase: DebatePhase,
    pub delegate: DelegateId,
    /// Whether the call produced a result after retries
    pub success: bool,
    /// Attempts spent (1 when the first attempt succeeded)
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    /// Wall-clock duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl CallStatistic {
    pub fn new(model: ModelId, phase: DebatePhase, delegate: DelegateId) -> Self {
        let provider = model.provider().to_string();
        Self {
            timestamp: current_timestamp(),
            model,
            provider,
            phase,
            delegate,
            success: true,
            attempts: 1,
            cost: None,
            input_tokens: None,
            output_tokens: None,
            duration_ms: None,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_tokens(mut self, input: Option<u64>, output: Option<u64>) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    pub fn with_cost(mut self, cost: Option<f64>) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    /// Input plus output tokens, missing counts as zero
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.unwrap_or(0) + self.output_tokens.unwrap_or(0)
    }

    /// Positive recorded duration, if any
    pub fn timed_duration(&self) -> Option<u64> {
        self.duration_ms.filter(|d| *d > 0)
    }
}
