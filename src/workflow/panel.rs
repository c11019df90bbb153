//! Workflow panel state machine.

use std::sync::Arc;

use parking_lot::Mutex;

use super::sources::ATTENDANCE_STEP_SOURCES;
use super::step::{StepModel, StepStatus, WorkflowStep};
use super::DEFAULT_QUERY;
use crate::core::{Error, Result};

/// Panel shared between the UI thread and a spawned run.
///
/// Locks are only held for a single state change, never across an await.
pub type SharedPanel = Arc<Mutex<WorkflowPanel>>;

/// Proof that a run was started; returned by [`WorkflowPanel::begin_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    /// 1-based run number within this panel
    pub run: usize,
    /// Query the run was started with
    pub query: String,
    /// Number of steps to execute
    pub steps: usize,
}

/// Completion counts for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkflowProgress {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

impl WorkflowProgress {
    /// Ratio of finished steps, 0.0 when there are none.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed + self.failed) as f64 / self.total as f64
        }
    }
}

/// Ordered steps plus the append-only query history.
#[derive(Debug, Clone)]
pub struct WorkflowPanel {
    query: String,
    steps: Vec<WorkflowStep>,
    history: Vec<String>,
    running: bool,
}

impl WorkflowPanel {
    /// Create a panel with the given query and steps.
    pub fn new(query: impl Into<String>, steps: Vec<WorkflowStep>) -> Self {
        Self { query: query.into(), steps, history: Vec::new(), running: false }
    }

    /// The attendance report demo: three steps already completed.
    pub fn attendance_report() -> Self {
        let steps = vec![
            WorkflowStep::new("step1", "Data Analysis", StepModel::ChatGpt)
                .with_status(StepStatus::Completed)
                .with_output(
                    "Analyzed attendance data for CS-2025 batch (156 students). Found 12 students \
                     below 75% threshold. Average attendance: 87.3%. Peak attendance on Mondays \
                     (94%), lowest on Fridays (82%).",
                )
                .with_confidence(94)
                .with_execution_time(2.3),
            WorkflowStep::new("step2", "Research & Context", StepModel::Perplexity)
                .with_status(StepStatus::Completed)
                .with_output(
                    "Retrieved institutional policies: Minimum 75% attendance required. Late \
                     entry affects participation grades. Weather patterns show 15% increase in \
                     absences during monsoon season (June-Sept).",
                )
                .with_sources(ATTENDANCE_STEP_SOURCES.iter().map(ToString::to_string).collect())
                .with_confidence(89)
                .with_execution_time(3.1),
            WorkflowStep::new("step3", "Recommendations", StepModel::Gemini)
                .with_status(StepStatus::Completed)
                .with_output(
                    "Recommendations: 1) Implement flexible attendance for weather emergencies \
                     2) Early warning system at 70% 3) Peer mentorship program for \
                     low-attendance students 4) Digital attendance with geofencing",
                )
                .with_confidence(91)
                .with_execution_time(1.8),
        ];
        Self::new(DEFAULT_QUERY, steps)
    }

    /// Wrap the panel for sharing with a runner.
    pub fn shared(self) -> SharedPanel {
        Arc::new(Mutex::new(self))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query used by the next run.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&WorkflowStep> {
        self.steps.get(index)
    }

    /// Submitted queries, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn statuses(&self) -> Vec<StepStatus> {
        self.steps.iter().map(|s| s.status).collect()
    }

    pub fn progress(&self) -> WorkflowProgress {
        let mut progress = WorkflowProgress { total: self.steps.len(), ..Default::default() };
        for step in &self.steps {
            match step.status {
                StepStatus::Completed => progress.completed += 1,
                StepStatus::Failed => progress.failed += 1,
                StepStatus::Pending | StepStatus::Running => {}
            }
        }
        progress
    }

    /// Start a run.
    ///
    /// Appends the current query to the history and resets every step to
    /// pending, dropping the previous run's output, error and timing.
    /// Fails with [`Error::WorkflowBusy`] while a run is in flight, in which
    /// case nothing changes.
    pub fn begin_run(&mut self) -> Result<RunTicket> {
        if self.running {
            return Err(Error::WorkflowBusy);
        }
        self.running = true;
        self.history.push(self.query.clone());
        for step in &mut self.steps {
            step.status = StepStatus::Pending;
            step.output = None;
            step.error = None;
            step.execution_time_secs = None;
        }
        tracing::debug!(run = self.history.len(), query = %self.query, "Workflow run started");
        Ok(RunTicket { run: self.history.len(), query: self.query.clone(), steps: self.steps.len() })
    }

    /// Move a step from pending to running.
    pub fn mark_running(&mut self, index: usize) -> Result<()> {
        self.transition(index, StepStatus::Running)?;
        Ok(())
    }

    /// Move a running step to completed and store its output.
    pub fn record_success(
        &mut self,
        index: usize,
        output: impl Into<String>,
        execution_time_secs: f64,
    ) -> Result<()> {
        let step = self.transition(index, StepStatus::Completed)?;
        step.output = Some(output.into());
        step.execution_time_secs = Some(execution_time_secs);
        step.error = None;
        Ok(())
    }

    /// Overwrite the confidence reported for a step.
    pub fn set_confidence(&mut self, index: usize, confidence: u8) {
        if let Some(step) = self.steps.get_mut(index) {
            step.confidence = Some(confidence.min(100));
        }
    }

    /// Move a running step to failed. Any earlier output is kept.
    pub fn record_failure(&mut self, index: usize, message: impl Into<String>) -> Result<()> {
        let step = self.transition(index, StepStatus::Failed)?;
        step.error = Some(message.into());
        Ok(())
    }

    /// Clear the in-flight flag.
    ///
    /// A step left running (the run was torn down mid-step) is marked failed.
    pub fn finish_run(&mut self) {
        for step in &mut self.steps {
            if step.status == StepStatus::Running {
                step.status = StepStatus::Failed;
                step.error.get_or_insert_with(|| "cancelled".to_string());
            }
        }
        self.running = false;
        tracing::debug!(statuses = ?self.statuses(), "Workflow run finished");
    }

    /// Reset one step to pending. Other steps are untouched.
    ///
    /// The step currently executing belongs to the runner and is refused
    /// with [`Error::WorkflowBusy`].
    pub fn retry_step(&mut self, id: &str) -> Result<()> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownStep(id.to_string()))?;
        if step.status == StepStatus::Running {
            return Err(Error::WorkflowBusy);
        }
        step.status = StepStatus::Pending;
        step.error = None;
        tracing::debug!(step = id, "Step reset to pending");
        Ok(())
    }

    /// Reset every step to pending, except one that is executing.
    pub fn retry_all(&mut self) {
        for step in self.steps.iter_mut().filter(|s| s.status != StepStatus::Running) {
            step.status = StepStatus::Pending;
            step.error = None;
        }
    }

    fn transition(&mut self, index: usize, next: StepStatus) -> Result<&mut WorkflowStep> {
        let step = self
            .steps
            .get_mut(index)
            .ok_or_else(|| Error::UnknownStep(format!("#{index}")))?;
        if !step.status.can_advance_to(next) {
            return Err(Error::validation(
                step.id.clone(),
                format!("cannot move from {} to {next}", step.status),
            ));
        }
        step.status = next;
        Ok(step)
    }
}

impl Default for WorkflowPanel {
    fn default() -> Self {
        Self::attendance_report()
    }
}
