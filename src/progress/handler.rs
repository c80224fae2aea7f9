//! Progress handler trait and events

use std::fmt;
use std::time::Duration;

/// Workflow phases, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Clone,
    Build,
    Locate,
    Patch,
    Handoff,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Clone => "clone",
            Phase::Build => "build",
            Phase::Locate => "locate",
            Phase::Patch => "patch",
            Phase::Handoff => "handoff",
        };
        f.write_str(name)
    }
}

/// Events emitted while a workflow runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Workflow started
    Started { workflow: String },

    PhaseStarted { phase: Phase },

    PhaseComplete { phase: Phase, duration: Duration },

    /// Workflow completed successfully
    Completed { total_time: Duration },

    /// Workflow aborted in `phase`
    Failed { phase: Phase, error: String },
}

/// Trait for handling progress events during a workflow
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}
