//! Output formatter trait

use arena_domain::DebateSession;

/// Trait for formatting debate results
pub trait OutputFormatter {
    /// Format the full transcript
    fn format(&self, session: &DebateSession) -> String;

    /// Format as JSON
    fn format_json(&self, session: &DebateSession) -> String;

    /// Format the winner and model ranking only (concise output)
    fn format_leaderboard(&self, session: &DebateSession) -> String;
}
