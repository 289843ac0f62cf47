//! Use cases (application services)

pub mod retry;
pub mod run_phase;
