//! CLI command definitions

use arena_domain::{DelegateId, ModelId};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full transcript with every phase and the leaderboard
    Full,
    /// Winner and model ranking only
    Leaderboard,
    /// JSON output
    Json,
}

impl From<OutputFormat> for arena_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => arena_domain::OutputFormat::Full,
            OutputFormat::Leaderboard => arena_domain::OutputFormat::Leaderboard,
            OutputFormat::Json => arena_domain::OutputFormat::Json,
        }
    }
}

/// A `--seat` assignment: `D<n>=<provider>/<model>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatArg {
    pub delegate: DelegateId,
    pub model: ModelId,
}

/// Parse `D2=anthropic/claude-sonnet-4.5`
pub fn parse_seat(s: &str) -> Result<SeatArg, String> {
    let (seat, model) = s
        .split_once('=')
        .ok_or_else(|| format!("expected D<n>=<model>, got '{}'", s))?;
    let delegate: DelegateId = seat.parse().map_err(|e| format!("{}", e))?;
    let model = ModelId::new(model);
    if model.is_unassigned() {
        return Err(format!("seat {} has an empty model", delegate));
    }
    Ok(SeatArg { delegate, model })
}

/// CLI arguments for gov-arena
#[derive(Parser, Debug)]
#[command(name = "gov-arena")]
#[command(author, version, about = "Policy arena - language models debate a governance scenario")]
#[command(long_about = r#"
gov-arena seats up to six delegates, each backed by a language model, and
runs them through a policy debate on a scenario:

1. Proposal:  every delegate drafts a policy
2. Critique:  every delegate critiques one rival policy
3. Refactor:  every delegate revises its policy against the critiques it got
4. Vote:      every delegate votes for the best rival policy

The delegate with a strict plurality of votes wins, and the models are
ranked on votes, participation, policy length and speed.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./arena.toml        Project-level config (or ./.arena.toml)
3. ~/.config/gov-arena/config.toml   Global config

Example:
  gov-arena "A city faces a week-long heatwave and rolling blackouts"
  gov-arena -s D1=openai/gpt-5.1 -s D2=xai/grok-4 "Regulate ride-share pricing"
  gov-arena -m openai/gpt-5.1 -m anthropic/claude-sonnet-4.5 --output json "..."
"#)]
pub struct Cli {
    /// The scenario to debate
    pub scenario: Option<String>,

    /// Seat a model at a specific seat (can be specified multiple times)
    #[arg(short, long = "seat", value_name = "D<n>=MODEL", value_parser = parse_seat)]
    pub seats: Vec<SeatArg>,

    /// Models to seat in table order, D1 first (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Call delegates one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output format (overrides `output.format` from the config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// AI gateway API key (overrides the environment and config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Write a JSONL transcript of every request and response
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Write diagnostic logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Seat assignments from `-m` (in table order) overlaid with `-s`
    pub fn seat_assignments(&self) -> Vec<(DelegateId, ModelId)> {
        let mut seats: Vec<(DelegateId, ModelId)> = DelegateId::all()
            .zip(self.model.iter().map(ModelId::new))
            .filter(|(_, model)| !model.is_unassigned())
            .collect();

        for seat in &self.seats {
            match seats.iter_mut().find(|(id, _)| *id == seat.delegate) {
                Some(existing) => existing.1 = seat.model.clone(),
                None => seats.push((seat.delegate, seat.model.clone())),
            }
        }
        seats.sort_by_key(|(id, _)| *id);
        seats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn d(seat: u8) -> DelegateId {
        DelegateId::new(seat).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seat() {
        let seat = parse_seat("d2=anthropic/claude-sonnet-4.5").unwrap();
        assert_eq!(seat.delegate, d(2));
        assert_eq!(seat.model, ModelId::new("anthropic/claude-sonnet-4.5"));

        assert!(parse_seat("D2").is_err());
        assert!(parse_seat("D7=openai/gpt-5").is_err());
        assert!(parse_seat("D1=  ").is_err());
    }

    #[test]
    fn test_seat_flags_override_model_order() {
        let cli = Cli::parse_from([
            "gov-arena",
            "-m",
            "openai/gpt-5.1",
            "-m",
            "google/gemini-3-pro-preview",
            "-s",
            "D2=xai/grok-4",
            "-s",
            "D5=mistral/mistral-large",
            "heatwave",
        ]);

        assert_eq!(cli.scenario.as_deref(), Some("heatwave"));
        assert_eq!(
            cli.seat_assignments(),
            vec![
                (d(1), ModelId::new("openai/gpt-5.1")),
                (d(2), ModelId::new("xai/grok-4")),
                (d(5), ModelId::new("mistral/mistral-large")),
            ]
        );
    }

    #[test]
    fn test_output_and_flags() {
        let cli = Cli::parse_from([
            "gov-arena",
            "--output",
            "leaderboard",
            "--sequential",
            "-vv",
            "x",
        ]);
        assert_eq!(
            cli.output.map(arena_domain::OutputFormat::from),
            Some(arena_domain::OutputFormat::Leaderboard)
        );
        assert!(cli.sequential);
        assert_eq!(cli.verbose, 2);
        assert!(cli.seat_assignments().is_empty());
    }
}
