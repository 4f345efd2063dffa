//! Progress notification port
//!
//! Defines the interface for reporting progress during a review run.

use review_domain::AgentRole;

/// Phases of a review run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewPhase {
    /// Specialists reviewing the diff concurrently
    Specialists,
    /// Arbiter reconciling the specialists
    Arbiter,
    /// Verdict and comment placement
    Synthesis,
}

impl ReviewPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewPhase::Specialists => "specialists",
            ReviewPhase::Arbiter => "arbiter",
            ReviewPhase::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReviewPhase::Specialists => "Specialist Reviews",
            ReviewPhase::Arbiter => "Arbiter Decision",
            ReviewPhase::Synthesis => "Synthesis",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ReviewPhase::Specialists => "🔍",
            ReviewPhase::Arbiter => "⚖️",
            ReviewPhase::Synthesis => "🧩",
        }
    }
}

impl std::fmt::Display for ReviewPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Callback for progress updates during a review run
///
/// Implementations live in the presentation layer.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: ReviewPhase, total_tasks: usize);

    /// Called when an agent finishes within a phase
    fn on_agent_complete(&self, phase: ReviewPhase, role: AgentRole, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: ReviewPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: ReviewPhase, _total_tasks: usize) {}
    fn on_agent_complete(&self, _phase: ReviewPhase, _role: AgentRole, _success: bool) {}
    fn on_phase_complete(&self, _phase: ReviewPhase) {}
}
