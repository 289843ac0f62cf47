//! Port definitions (interfaces for external adapters)

pub mod conversation_logger;
pub mod credentials;
pub mod generation;
pub mod progress;
