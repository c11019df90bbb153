//! Multi-step research workflow.
//!
//! A [`WorkflowPanel`] holds an ordered list of steps and the session
//! history of submitted queries. A [`WorkflowRunner`] drives the panel
//! through a [`StepBackend`], one step at a time:
//!
//! ```text
//! pending -> running -> completed | failed
//! ```
//!
//! Retrying a step only resets it to pending; it runs again on the next
//! `execute_all`.

mod backend;
mod panel;
mod report;
mod runner;
mod sources;
mod step;

use serde::{Deserialize, Serialize};

pub use backend::{SimulatedBackend, StepBackend, StepOutput};
pub use panel::{RunTicket, SharedPanel, WorkflowPanel, WorkflowProgress};
pub use report::{export_report, WorkflowReport};
pub use runner::{CancelHandle, CancelToken, RunSummary, WorkflowEvent, WorkflowRunner};
pub use sources::{mock_sources, SourceCitation};
pub use step::{StepModel, StepStatus, WorkflowStep};

/// Query the demo panel starts with.
pub const DEFAULT_QUERY: &str =
    "Generate a comprehensive attendance report for CS-2025 batch with insights and recommendations";

/// What the runner does after a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run; later steps stay pending.
    #[default]
    Halt,
    /// Keep going with the next step.
    Continue,
}

impl std::str::FromStr for FailurePolicy {
    type Err = crate::core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "halt" | "stop" => Ok(Self::Halt),
            "continue" => Ok(Self::Continue),
            other => Err(crate::core::Error::validation(
                "policy",
                format!("expected 'halt' or 'continue', got '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Halt => f.write_str("halt"),
            Self::Continue => f.write_str("continue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("halt".parse::<FailurePolicy>().unwrap(), FailurePolicy::Halt);
        assert_eq!("Continue".parse::<FailurePolicy>().unwrap(), FailurePolicy::Continue);
        assert!("retry".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Halt);
    }
}
