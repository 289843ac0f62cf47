//! Port for the debate transcript.
//!
//! Defines the [`ConversationLogger`] trait for recording debate events
//! (prompts sent, responses received, parsed outcomes, phase boundaries) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the full transcript
//! in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "phase_started", "delegate_response").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging transcript events.
///
/// `log` is synchronous and infallible; a failed write must never abort a
/// debate.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when no transcript is requested.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
