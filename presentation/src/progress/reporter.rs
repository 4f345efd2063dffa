//! Progress reporting for review runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use review_application::{ProgressNotifier, ReviewPhase};
use review_domain::AgentRole;
use std::sync::Mutex;

/// Reports progress during a review with progress bars
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

    fn prefix(phase: ReviewPhase) -> String {
        format!("{} {}", phase.emoji(), phase.display_name())
    }

    fn agent_status(role: AgentRole, success: bool) -> String {
        if success {
            format!("{} {}", "v".green(), role.title())
        } else {
            format!("{} {}", "x".red(), role.title())
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: ReviewPhase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::prefix(phase));
        pb.set_message("Starting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_agent_complete(&self, _phase: ReviewPhase, role: AgentRole, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(Self::agent_status(role, success));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: ReviewPhase) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: ReviewPhase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            ProgressReporter::prefix(phase).bold(),
            total_tasks
        );
    }

    fn on_agent_complete(&self, _phase: ReviewPhase, role: AgentRole, success: bool) {
        if success {
            eprintln!("  {}", ProgressReporter::agent_status(role, true));
        } else {
            eprintln!("  {} (failed)", ProgressReporter::agent_status(role, false));
        }
    }

    fn on_phase_complete(&self, _phase: ReviewPhase) {
        eprintln!();
    }
}
