//! Application-layer configuration types.
//!
//! - [`DebateParams`]: retry, timeout and scheduling control for the orchestrator

pub mod debate_params;

pub use debate_params::{Concurrency, DebateParams};
