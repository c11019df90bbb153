//! Step execution backends.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use super::step::{StepModel, WorkflowStep};
use crate::core::{Error, Result};

/// Result of a successful step call.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub text: String,
    pub confidence: Option<u8>,
}

/// Something a workflow step can be delegated to.
///
/// Implementations must be cancel-safe: the runner may drop the future
/// mid-call when the run is cancelled.
#[async_trait]
pub trait StepBackend: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &str;

    /// Execute one step for the given query.
    async fn execute(&self, step: &WorkflowStep, query: &str) -> Result<StepOutput>;
}

/// Backend that waits a fixed delay and returns canned text.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    failing: HashSet<String>,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay, failing: HashSet::new() }
    }

    /// Make the given step fail with a transient error.
    #[must_use]
    pub fn fail_on(mut self, step_id: impl Into<String>) -> Self {
        self.failing.insert(step_id.into());
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn canned(step: &WorkflowStep, query: &str) -> String {
        // Seeded steps already carry the prototype's text
        if let Some(output) = &step.output {
            return output.clone();
        }
        match step.model {
            StepModel::ChatGpt => format!("Analysis of \"{query}\" complete."),
            StepModel::Perplexity => format!("Context gathered for \"{query}\"."),
            StepModel::Gemini => format!("Recommendations drafted for \"{query}\"."),
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl StepBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn execute(&self, step: &WorkflowStep, query: &str) -> Result<StepOutput> {
        tokio::time::sleep(self.delay).await;
        if self.failing.contains(&step.id) {
            return Err(Error::transient(&step.id, format!("{} did not respond", step.model)));
        }
        Ok(StepOutput { text: Self::canned(step, query), confidence: step.confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_success() {
        let backend = SimulatedBackend::new(Duration::ZERO);
        let step = WorkflowStep::new("s1", "Data Analysis", StepModel::ChatGpt);
        let out = backend.execute(&step, "attendance").await.unwrap();
        assert!(out.text.contains("attendance"));
        assert_eq!(out.confidence, None);
    }

    #[tokio::test]
    async fn test_simulated_failure_is_transient() {
        let backend = SimulatedBackend::new(Duration::ZERO).fail_on("s1");
        let step = WorkflowStep::new("s1", "Data Analysis", StepModel::ChatGpt);
        let err = backend.execute(&step, "q").await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("ChatGPT"));
    }

    #[tokio::test]
    async fn test_seeded_output_is_returned() {
        let backend = SimulatedBackend::new(Duration::ZERO);
        let step = WorkflowStep::new("s", "S", StepModel::Gemini).with_output("fixed");
        assert_eq!(backend.execute(&step, "q").await.unwrap().text, "fixed");
    }
}
