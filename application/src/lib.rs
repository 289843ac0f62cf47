//! Application layer for gov-arena
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{Concurrency, DebateParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    credentials::{CredentialProvider, NoCredential, normalize_credential},
    generation::{GatewayError, Generation, GenerationClient, GenerationRequest},
    progress::{DebateProgressNotifier, NoProgress},
};
pub use use_cases::retry::{CallError, RetryPolicy, call_with_retry};
pub use use_cases::run_phase::{DebateOrchestrator, PhaseRequest, RunPhaseError};
