//! CLI entrypoint for gov-arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use arena_application::{
    Concurrency, ConversationLogger, DebateOrchestrator, DebateProgressNotifier, NoConversationLogger,
    NoProgress,
};
use arena_domain::{DebateSession, DelegateId, ModelId, OutputFormat};
use arena_infrastructure::{
    AiGatewayClient, ChainedCredentialProvider, ConfigLoader, FileConfig, JsonlConversationLogger,
};
use arena_presentation::{Cli, ConsoleFormatter, ProgressReporter};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let _log_guard = init_logging(&cli)?;
    info!("Starting gov-arena");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?
    };
    check_config(&config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(scenario) = cli.scenario.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        bail!("A scenario is required, e.g. gov-arena \"A city faces a week-long heatwave\"");
    };

    let (mut params, _) = config.debate.to_debate_params();
    if cli.sequential {
        params = params.with_concurrency(Concurrency::Sequential);
    }

    let format: OutputFormat = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    // === Session ===
    let mut session = DebateSession::new().with_scenario(scenario);
    for (delegate, model) in seat_roster(&cli, &config) {
        session.assign_model(delegate, model)?;
    }

    // === Dependency Injection ===
    let gateway = Arc::new(AiGatewayClient::from_config(&config.gateway)?);
    let credentials = Arc::new(ChainedCredentialProvider::from_config(
        &config.gateway,
        cli.api_key.as_deref(),
    ));

    let show_progress = !cli.quiet && config.output.show_progress && format != OutputFormat::Json;
    let progress: Arc<dyn DebateProgressNotifier> = if show_progress {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(NoProgress)
    };

    let conversation_logger: Arc<dyn ConversationLogger> = match &cli.transcript {
        Some(path) => Arc::new(
            JsonlConversationLogger::create(path)
                .with_context(|| format!("cannot open transcript {}", path.display()))?,
        ),
        None => Arc::new(NoConversationLogger),
    };

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping the debate");
                token.cancel();
            }
        });
    }

    let orchestrator = DebateOrchestrator::new(gateway, credentials)
        .with_params(params)
        .with_progress(progress)
        .with_conversation_logger(conversation_logger)
        .with_cancellation(cancellation);

    if show_progress {
        print_banner(&session);
    }

    let result = orchestrator.run_debate(&mut session).await;

    match result {
        Ok(_) => {
            println!("{}", ConsoleFormatter::render(&session, format));
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("{}", "Debate cancelled.".yellow());
            Ok(())
        }
        Err(e) => {
            // Show whatever was committed before the failure
            if session.phase() != arena_domain::DebatePhase::Setup {
                println!("{}", ConsoleFormatter::render(&session, format));
            }
            Err(e.into())
        }
    }
}

/// Set up tracing from `-v` and `--log-file`
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &cli.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("invalid log file path {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Print warnings; refuse to run on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        eprintln!("{} {}", "warning:".yellow().bold(), issue.message());
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message())
        .collect();
    if !errors.is_empty() {
        bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

/// Seats from the config file, overridden by `-m`/`-s`, else the default line-up
fn seat_roster(cli: &Cli, config: &FileConfig) -> Vec<(DelegateId, ModelId)> {
    let (mut seats, _) = config.seats.parse_seats();
    for (delegate, model) in cli.seat_assignments() {
        match seats.iter_mut().find(|(id, _)| *id == delegate) {
            Some(existing) => existing.1 = model,
            None => seats.push((delegate, model)),
        }
    }

    if seats.is_empty() {
        return DelegateId::all().zip(ModelId::default_models()).collect();
    }
    seats.sort_by_key(|(id, _)| *id);
    seats
}

fn print_banner(session: &DebateSession) {
    println!();
    println!("+============================================================+");
    println!("|           gov-arena - Policy Debate                        |");
    println!("+============================================================+");
    println!();
    println!("Scenario: {}", session.scenario());
    println!(
        "Delegates: {}",
        session
            .active_delegates()
            .map(|d| format!("{}={}", d.id, d.model))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
}
