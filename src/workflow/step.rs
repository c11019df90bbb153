//! Workflow step model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend capability a step is delegated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepModel {
    #[serde(rename = "ChatGPT")]
    ChatGpt,
    Perplexity,
    Gemini,
}

impl StepModel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChatGpt => "ChatGPT",
            Self::Perplexity => "Perplexity",
            Self::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for StepModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a workflow step.
///
/// Within one run a step only moves forward:
/// `Pending -> Running -> Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    /// Check if the step has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether moving to `next` is allowed inside a run.
    pub fn can_advance_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running) | (Self::Running, Self::Completed | Self::Failed)
        )
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Pending => "○",
            Self::Running => "◐",
            Self::Completed => "●",
            Self::Failed => "⊗",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One stage of the processing chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    pub model: StepModel,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_secs: Option<f64>,
    /// Last failure message, kept until the step succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowStep {
    /// Create a pending step.
    pub fn new(id: impl Into<String>, name: impl Into<String>, model: StepModel) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model,
            status: StepStatus::Pending,
            output: None,
            sources: None,
            confidence: None,
            execution_time_secs: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = Some(sources);
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence.min(100));
        self
    }

    #[must_use]
    pub fn with_execution_time(mut self, secs: f64) -> Self {
        self.execution_time_secs = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(StepStatus::Pending.can_advance_to(StepStatus::Running));
        assert!(StepStatus::Running.can_advance_to(StepStatus::Completed));
        assert!(StepStatus::Running.can_advance_to(StepStatus::Failed));
        assert!(!StepStatus::Pending.can_advance_to(StepStatus::Completed));
        assert!(!StepStatus::Completed.can_advance_to(StepStatus::Running));
        assert!(!StepStatus::Running.can_advance_to(StepStatus::Running));
    }

    #[test]
    fn test_terminal() {
        assert!(!StepStatus::Pending.is_terminal());
        assert!(!StepStatus::Running.is_terminal());
        assert!(StepStatus::Completed.is_terminal());
        assert!(StepStatus::Failed.is_terminal());
    }

    #[test]
    fn test_confidence_clamped() {
        let step = WorkflowStep::new("s", "Step", StepModel::Gemini).with_confidence(140);
        assert_eq!(step.confidence, Some(100));
        assert_eq!(step.status, StepStatus::Pending);
    }

    #[test]
    fn test_model_serde_label() {
        let json = serde_json::to_string(&StepModel::ChatGpt).unwrap();
        assert_eq!(json, "\"ChatGPT\"");
        assert_eq!(StepModel::Perplexity.to_string(), "Perplexity");
    }
}
