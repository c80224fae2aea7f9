//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { workflow } => {
                info!(workflow = %workflow, "Starting workflow");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                info!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::Completed { total_time } => {
                info!(total_time_ms = total_time.as_millis(), "Workflow complete");
            }
            ProgressEvent::Failed { phase, error } => {
                error!(phase = %phase, error = %error, "Workflow failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Phase;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                workflow: "run".to_string(),
            },
            ProgressEvent::PhaseStarted {
                phase: Phase::Build,
            },
            ProgressEvent::PhaseComplete {
                phase: Phase::Build,
                duration: Duration::from_millis(50),
            },
            ProgressEvent::Completed {
                total_time: Duration::from_secs(5),
            },
            ProgressEvent::Failed {
                phase: Phase::Handoff,
                error: "Recipe runner exited with status 2".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
