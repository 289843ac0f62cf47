//! Presentation layer for gov-arena
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, SeatArg};
pub use output::console::ConsoleFormatter;
pub use output::report::DebateReport;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
