//! Console output formatter for debate results

use crate::output::formatter::OutputFormatter;
use crate::output::report::DebateReport;
use arena_domain::{DebateSession, Delegate, ModelPerformance, OutputFormat};
use colored::Colorize;

/// Formats debate sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render in the requested format
    pub fn render(session: &DebateSession, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(session),
            OutputFormat::Leaderboard => Self::format_leaderboard(session),
            OutputFormat::Json => Self::format_json(session),
        }
    }

    /// Format the full transcript
    pub fn format(session: &DebateSession) -> String {
        let delegates: Vec<&Delegate> = session.active_delegates().collect();
        let mut output = String::new();

        output.push_str(&Self::header("Policy Arena Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Scenario:".cyan().bold(),
            session.scenario()
        ));

        output.push_str(&format!("{}\n", "Delegates:".cyan().bold()));
        for delegate in &delegates {
            output.push_str(&format!("  {}  {}\n", delegate.id.to_string().bold(), delegate.model));
        }

        output.push_str(&Self::section_header("Policy Proposals"));
        for delegate in &delegates {
            output.push_str(&Self::policy_block(delegate, delegate.policy.as_deref()));
        }

        if delegates.iter().any(|d| d.critique.is_some()) {
            output.push_str(&Self::section_header("Critiques"));
            for delegate in &delegates {
                let Some(critique) = &delegate.critique else {
                    continue;
                };
                let title = match critique.target {
                    Some(target) => format!("── {} on {} ──", delegate.id, target),
                    None => format!("── {} ──", delegate.id),
                };
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    title.yellow().bold(),
                    Self::indent(&critique.message, "  ")
                ));
            }
        }

        if delegates.iter().any(|d| d.refactored_policy.is_some()) {
            output.push_str(&Self::section_header("Refactored Policies"));
            for delegate in &delegates {
                if delegate.refactored_policy.is_some() {
                    output.push_str(&Self::policy_block(
                        delegate,
                        delegate.refactored_policy.as_deref(),
                    ));
                }
            }
        }

        if delegates.iter().any(|d| d.ballot.is_some()) {
            output.push_str(&Self::section_header("Votes"));
            for delegate in &delegates {
                let Some(ballot) = &delegate.ballot else {
                    continue;
                };
                let choice = match ballot.target {
                    Some(target) => target.to_string().green().bold().to_string(),
                    None => "abstained".dimmed().to_string(),
                };
                output.push_str(&format!("  {} -> {}", delegate.id.to_string().bold(), choice));
                if let Some(explanation) = &ballot.explanation {
                    output.push_str(&format!("  {}", explanation));
                }
                output.push('\n');
            }
        }

        output.push_str(&Self::section_header("Results"));
        output.push_str(&Self::outcome(session));
        output.push('\n');
        output.push_str(&Self::ranking(&session.performance()));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(session: &DebateSession) -> String {
        serde_json::to_string_pretty(&DebateReport::from_session(session))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the winner and model ranking only (concise output)
    pub fn format_leaderboard(session: &DebateSession) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Policy Arena Leaderboard ===".cyan().bold()));
        output.push_str(&format!("{} {}\n\n", "Scenario:".bold(), session.scenario()));
        output.push_str(&Self::outcome(session));
        output.push('\n');
        output.push_str(&Self::ranking(&session.performance()));

        output
    }

    /// Vote tally and winner line
    fn outcome(session: &DebateSession) -> String {
        let tally = session.tally();
        let mut output = String::new();

        for (delegate, votes) in tally.iter() {
            output.push_str(&format!(
                "  {}  {} vote{}\n",
                delegate.to_string().bold(),
                votes,
                if votes == 1 { "" } else { "s" }
            ));
        }

        let verdict = match session.winner() {
            Some(winner) => {
                let model = session
                    .delegate(winner)
                    .map(|d| d.model.to_string())
                    .unwrap_or_default();
                format!("Winner: {} ({})", winner, model).green().bold()
            }
            None if tally.is_empty() => "No votes were cast".yellow().bold(),
            None => format!(
                "No winner: tie between {}",
                tally
                    .leaders()
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
            .yellow()
            .bold(),
        };
        output.push_str(&format!("\n{}\n", verdict));
        output
    }

    /// Model leaderboard table
    fn ranking(performance: &[ModelPerformance]) -> String {
        if performance.is_empty() {
            return String::new();
        }

        let mut output = format!(
            "\n{}\n{:<4} {:<36} {:>7} {:>6} {:>7} {:>9} {:>8}\n",
            "Leaderboard:".cyan().bold(),
            "#",
            "Model",
            "Score",
            "Votes",
            "Part.",
            "Avg ms",
            "Tokens"
        );
        for entry in performance {
            let avg = if entry.is_timed() {
                format!("{:.0}", entry.avg_duration_ms)
            } else {
                "-".to_string()
            };
            let line = format!(
                "{:<4} {:<36} {:>7.1} {:>6} {:>7} {:>9} {:>8}",
                entry.rank,
                entry.model.as_str(),
                entry.final_score,
                entry.votes_received,
                entry.participation,
                avg,
                entry.total_tokens
            );
            if entry.rank == 1 {
                output.push_str(&format!("{}\n", line.green()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        output
    }

    fn policy_block(delegate: &Delegate, policy: Option<&str>) -> String {
        let title = format!("── {} ({}) ──", delegate.id, delegate.model);
        match policy.filter(|p| !p.trim().is_empty()) {
            Some(policy) => format!("\n{}\n{}\n", title.yellow().bold(), Self::indent(policy, "  ")),
            None => format!("\n{}\n  {}\n", title.red().bold(), "(no policy)".dimmed()),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, session: &DebateSession) -> String {
        Self::format(session)
    }

    fn format_json(&self, session: &DebateSession) -> String {
        Self::format_json(session)
    }

    fn format_leaderboard(&self, session: &DebateSession) -> String {
        Self::format_leaderboard(session)
    }
}
