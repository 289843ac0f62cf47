//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`]: gateway model identifiers (`provider/model`)
//! - [`error::DomainError`]: domain-level errors
//! - [`string::preview`]: single-line previews by character count

pub mod error;
pub mod model;
pub mod string;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
