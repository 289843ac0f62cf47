//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use arena_domain::{DebatePhase, DelegateId, ModelId};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: DebatePhase, total_delegates: usize);

    /// Called when a delegate's call is dispatched
    fn on_delegate_start(&self, _phase: DebatePhase, _delegate: DelegateId, _model: &ModelId) {}

    /// Called when a delegate's call completes (after retries)
    fn on_delegate_complete(&self, phase: DebatePhase, delegate: DelegateId, success: bool);

    /// Called before a failed attempt is retried
    fn on_retry(&self, _delegate: DelegateId, _attempt: u32, _error: &str) {}

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: DebatePhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: DebatePhase, _total_delegates: usize) {}
    fn on_delegate_complete(&self, _phase: DebatePhase, _delegate: DelegateId, _success: bool) {}
    fn on_phase_complete(&self, _phase: DebatePhase) {}
}
