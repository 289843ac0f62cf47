//! Output formatting for debate results

pub mod console;
pub mod formatter;
pub mod report;

pub use console::ConsoleFormatter;
pub use formatter::OutputFormatter;
pub use report::DebateReport;
