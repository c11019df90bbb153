//! Error taxonomy shared by the dashboards, the login mock and the workflow panel.
//!
//! Every failure is contained at the component that raised it: forms surface
//! [`Error::Validation`] inline, workflow steps keep [`Error::TransientBackend`]
//! on the failed step, and a missing registry entry ([`Error::FatalConfig`]) is
//! logged while the dashboard falls back to an empty state.

use thiserror::Error;

use super::Role;

/// Result type for EduManage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in EduManage.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed form input. The operation was not attempted.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A delegated step call failed but may succeed on retry.
    #[error("step '{step}' failed: {message}")]
    TransientBackend { step: String, message: String },

    /// A role has no registered entry for a registry lookup.
    #[error("no {what} registered for role '{role}'")]
    FatalConfig { role: Role, what: &'static str },

    /// A workflow run is already in flight.
    #[error("workflow is already running")]
    WorkflowBusy,

    /// No step with the given id exists in the panel.
    #[error("unknown workflow step: {0}")]
    UnknownStep(String),

    /// The operation was cancelled before it finished.
    #[error("cancelled")]
    Cancelled,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Build a validation error for a form field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Build a transient backend error for a workflow step.
    pub fn transient(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransientBackend { step: step.into(), message: message.into() }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientBackend { .. } | Self::Cancelled)
    }
}
