//! Progress reporting while a debate runs

use arena_application::ports::progress::DebateProgressNotifier;
use arena_domain::{DebatePhase, DelegateId, ModelId};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with one bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// "Phase 2/4: Critiques"
    fn phase_label(phase: DebatePhase) -> String {
        match DebatePhase::ACTIONS.iter().position(|p| *p == phase) {
            Some(index) => format!(
                "Phase {}/{}: {}",
                index + 1,
                DebatePhase::ACTIONS.len(),
                phase.display_name()
            ),
            None => phase.display_name().to_string(),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.phase_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: DebatePhase, total_delegates: usize) {
        let pb = self.multi.add(ProgressBar::new(total_delegates as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.phase_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_delegate_start(&self, _phase: DebatePhase, delegate: DelegateId, model: &ModelId) {
        self.with_bar(|pb| pb.set_message(format!("{} ({})", delegate, model)));
    }

    fn on_delegate_complete(&self, _phase: DebatePhase, delegate: DelegateId, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), delegate)
            } else {
                format!("{} {}", "x".red(), delegate)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_retry(&self, delegate: DelegateId, attempt: u32, error: &str) {
        self.with_bar(|pb| {
            pb.println(format!(
                "  {} {} attempt {} failed: {}",
                "!".yellow(),
                delegate,
                attempt,
                error
            ))
        });
    }

    fn on_phase_complete(&self, phase: DebatePhase) {
        if let Ok(mut guard) = self.phase_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{} complete!", phase.display_name().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: DebatePhase, total_delegates: usize) {
        println!(
            "{} {} ({} delegates)",
            "->".cyan(),
            ProgressReporter::phase_label(phase).bold(),
            total_delegates
        );
    }

    fn on_delegate_complete(&self, _phase: DebatePhase, delegate: DelegateId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), delegate);
        } else {
            println!("  {} {} (failed)", "x".red(), delegate);
        }
    }

    fn on_retry(&self, delegate: DelegateId, attempt: u32, error: &str) {
        println!("  {} {} attempt {} failed: {}", "!".yellow(), delegate, attempt, error);
    }

    fn on_phase_complete(&self, _phase: DebatePhase) {
        println!();
    }
}
