//! Sequential workflow execution.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use super::backend::StepBackend;
use super::panel::{RunTicket, SharedPanel};
use super::FailurePolicy;
use crate::core::{Error, Result};

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    RunStarted { run: usize, query: String },
    StepStarted { index: usize, id: String },
    StepCompleted { index: usize, id: String },
    StepFailed { index: usize, id: String, message: String },
    RunFinished(RunSummary),
}

/// Outcome of one `execute_all` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    /// Run number, `None` when the call was skipped
    pub run: Option<usize>,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub cancelled: bool,
    /// Another run was already in flight; nothing happened
    pub skipped: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    fn skipped() -> Self {
        Self { skipped: true, ..Self::default() }
    }

    /// Every step completed.
    pub fn is_success(&self) -> bool {
        !self.skipped && !self.cancelled && self.failed == 0 && self.pending == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped {
            return write!(f, "skipped: a run is already in progress");
        }
        write!(f, "{} completed, {} failed, {} pending", self.completed, self.failed, self.pending)?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        write!(f, " in {:.1}s", self.elapsed.as_secs_f64())
    }
}

/// Owner side of a cancellation signal.
///
/// Dropping the handle cancels the run as well, so a run cannot outlive
/// the view that started it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Runner side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelHandle {
    /// Create a linked handle and token.
    pub fn new() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelToken { rx: Some(rx) })
    }

    pub fn cancel(&self) {
        // No receivers left means the run is already over
        let _ = self.tx.send(true);
    }
}

impl CancelToken {
    /// A token that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow() || rx.has_changed().is_err())
    }

    /// Resolve once cancellation is requested or the handle is dropped.
    pub async fn cancelled(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending::<()>().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Drives a [`SharedPanel`] through a [`StepBackend`].
pub struct WorkflowRunner {
    panel: SharedPanel,
    backend: Arc<dyn StepBackend>,
    policy: FailurePolicy,
    events: Option<mpsc::UnboundedSender<WorkflowEvent>>,
}

impl WorkflowRunner {
    pub fn new(panel: SharedPanel, backend: Arc<dyn StepBackend>) -> Self {
        Self { panel, backend, policy: FailurePolicy::default(), events: None }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send progress events to the given channel.
    #[must_use]
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn panel(&self) -> &SharedPanel {
        &self.panel
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run every step in order.
    ///
    /// Returns a skipped summary without touching the panel when another
    /// run is in flight.
    pub async fn execute_all(&self, mut cancel: CancelToken) -> Result<RunSummary> {
        let begun = self.panel.lock().begin_run();
        let ticket = match begun {
            Ok(ticket) => ticket,
            Err(Error::WorkflowBusy) => {
                tracing::debug!("Workflow already running, ignoring execute request");
                return Ok(RunSummary::skipped());
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            run = ticket.run,
            steps = ticket.steps,
            backend = self.backend.name(),
            policy = %self.policy,
            "Executing workflow"
        );
        self.emit(WorkflowEvent::RunStarted { run: ticket.run, query: ticket.query.clone() });

        let start = Instant::now();
        let outcome = self.run_steps(&ticket, &mut cancel).await;
        self.panel.lock().finish_run();
        let cancelled = outcome?;

        let progress = self.panel.lock().progress();
        let summary = RunSummary {
            run: Some(ticket.run),
            completed: progress.completed,
            failed: progress.failed,
            pending: progress.total - progress.completed - progress.failed,
            cancelled,
            skipped: false,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            completed = summary.completed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Workflow finished"
        );
        self.emit(WorkflowEvent::RunFinished(summary.clone()));
        Ok(summary)
    }

    /// Returns whether the run was cancelled.
    async fn run_steps(&self, ticket: &RunTicket, cancel: &mut CancelToken) -> Result<bool> {
        for index in 0..ticket.steps {
            if cancel.is_cancelled() {
                return Ok(true);
            }

            let step = {
                let mut panel = self.panel.lock();
                panel.mark_running(index)?;
                panel.step(index).cloned().ok_or_else(|| Error::UnknownStep(format!("#{index}")))?
            };
            tracing::debug!(step = %step.id, model = %step.model, "Step running");
            self.emit(WorkflowEvent::StepStarted { index, id: step.id.clone() });

            let started = Instant::now();
            let result = tokio::select! {
                result = self.backend.execute(&step, &ticket.query) => Some(result),
                () = cancel.cancelled() => None,
            };

            match result {
                Some(Ok(output)) => {
                    {
                        let mut panel = self.panel.lock();
                        panel.record_success(index, output.text, started.elapsed().as_secs_f64())?;
                        if let Some(confidence) = output.confidence {
                            panel.set_confidence(index, confidence);
                        }
                    }
                    self.emit(WorkflowEvent::StepCompleted { index, id: step.id });
                }
                Some(Err(e)) => {
                    let message = e.to_string();
                    tracing::warn!(step = %step.id, error = %message, "Step failed");
                    self.panel.lock().record_failure(index, message.clone())?;
                    self.emit(WorkflowEvent::StepFailed { index, id: step.id, message });
                    if self.policy == FailurePolicy::Halt {
                        return Ok(false);
                    }
                }
                None => {
                    tracing::info!(step = %step.id, "Workflow cancelled");
                    let message = Error::Cancelled.to_string();
                    self.panel.lock().record_failure(index, message.clone())?;
                    self.emit(WorkflowEvent::StepFailed { index, id: step.id, message });
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn emit(&self, event: WorkflowEvent) {
        if let Some(tx) = &self.events {
            // Receiver gone means nobody is watching; the run still proceeds
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{
        SimulatedBackend, StepModel, StepOutput, StepStatus, WorkflowPanel, WorkflowStep,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records the panel statuses each time a step is executed.
    struct SnapshotBackend {
        panel: SharedPanel,
        seen: Mutex<Vec<Vec<StepStatus>>>,
    }

    #[async_trait]
    impl StepBackend for SnapshotBackend {
        fn name(&self) -> &str {
            "snapshot"
        }

        async fn execute(&self, step: &WorkflowStep, _query: &str) -> Result<StepOutput> {
            let statuses = self.panel.lock().statuses();
            self.seen.lock().push(statuses);
            tokio::task::yield_now().await;
            Ok(StepOutput { text: format!("{} done", step.id), confidence: None })
        }
    }

    fn runner(panel: &SharedPanel, backend: SimulatedBackend) -> WorkflowRunner {
        WorkflowRunner::new(Arc::clone(panel), Arc::new(backend))
    }

    #[tokio::test]
    async fn test_execute_all_completes_in_order() {
        let panel = WorkflowPanel::attendance_report().shared();
        let backend = Arc::new(SnapshotBackend { panel: Arc::clone(&panel), seen: Mutex::new(vec![]) });
        let runner = WorkflowRunner::new(Arc::clone(&panel), backend.clone());

        let summary = runner.execute_all(CancelToken::never()).await.unwrap();
        assert!(summary.is_success());
        assert_eq!(summary.completed, 3);

        let seen = backend.seen.lock().clone();
        assert_eq!(
            seen,
            vec![
                vec![StepStatus::Running, StepStatus::Pending, StepStatus::Pending],
                vec![StepStatus::Completed, StepStatus::Running, StepStatus::Pending],
                vec![StepStatus::Completed, StepStatus::Completed, StepStatus::Running],
            ]
        );

        let panel = panel.lock();
        assert_eq!(panel.statuses(), vec![StepStatus::Completed; 3]);
        assert_eq!(panel.history(), &[crate::workflow::DEFAULT_QUERY.to_string()]);
        assert!(!panel.is_running());
    }

    #[tokio::test]
    async fn test_history_counts_every_call() {
        let panel = WorkflowPanel::attendance_report().shared();
        let runner = runner(&panel, SimulatedBackend::new(Duration::ZERO));
        for _ in 0..3 {
            runner.execute_all(CancelToken::never()).await.unwrap();
        }
        panel.lock().set_query("fee defaulters");
        runner.execute_all(CancelToken::never()).await.unwrap();

        let panel = panel.lock();
        assert_eq!(panel.history().len(), 4);
        assert_eq!(panel.history()[3], "fee defaulters");
    }

    #[tokio::test]
    async fn test_concurrent_call_is_skipped() {
        let panel = WorkflowPanel::attendance_report().shared();
        let slow = Arc::new(runner(&panel, SimulatedBackend::new(Duration::from_millis(50))));

        let first = tokio::spawn({
            let slow = Arc::clone(&slow);
            async move { slow.execute_all(CancelToken::never()).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(panel.lock().is_running());

        let second = slow.execute_all(CancelToken::never()).await.unwrap();
        assert!(second.skipped);
        assert_eq!(panel.lock().history().len(), 1);

        let first = first.await.unwrap().unwrap();
        assert!(first.is_success());
    }

    #[tokio::test]
    async fn test_halt_policy_leaves_rest_pending() {
        let panel = WorkflowPanel::attendance_report().shared();
        let runner = runner(&panel, SimulatedBackend::new(Duration::ZERO).fail_on("step2"));

        let summary = runner.execute_all(CancelToken::never()).await.unwrap();
        assert_eq!((summary.completed, summary.failed, summary.pending), (1, 1, 1));
        assert_eq!(
            panel.lock().statuses(),
            vec![StepStatus::Completed, StepStatus::Failed, StepStatus::Pending]
        );
        let error = panel.lock().step(1).and_then(|s| s.error.clone()).unwrap();
        assert!(error.contains("step2"));
    }

    #[tokio::test]
    async fn test_continue_policy_runs_remaining() {
        let panel = WorkflowPanel::attendance_report().shared();
        let runner = runner(&panel, SimulatedBackend::new(Duration::ZERO).fail_on("step1"))
            .with_policy(FailurePolicy::Continue);

        let summary = runner.execute_all(CancelToken::never()).await.unwrap();
        assert!(!summary.is_success());
        assert_eq!(
            panel.lock().statuses(),
            vec![StepStatus::Failed, StepStatus::Completed, StepStatus::Completed]
        );
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let panel = WorkflowPanel::attendance_report().shared();
        runner(&panel, SimulatedBackend::new(Duration::ZERO).fail_on("step2"))
            .execute_all(CancelToken::never())
            .await
            .unwrap();

        panel.lock().retry_step("step2").unwrap();
        assert_eq!(panel.lock().step(1).unwrap().status, StepStatus::Pending);

        let summary = runner(&panel, SimulatedBackend::new(Duration::ZERO))
            .execute_all(CancelToken::never())
            .await
            .unwrap();
        assert!(summary.is_success());
        assert_eq!(panel.lock().step(1).unwrap().error, None);
    }

    #[tokio::test]
    async fn test_retry_during_run_does_not_break_it() {
        let panel = WorkflowPanel::attendance_report().shared();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = runner(&panel, SimulatedBackend::new(Duration::from_millis(30))).with_events(tx);

        let (summary, ()) = tokio::join!(runner.execute_all(CancelToken::never()), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let mut panel = panel.lock();
            assert!(matches!(panel.retry_step("step1"), Err(Error::WorkflowBusy)));
            panel.retry_all();
        });

        let summary = summary.unwrap();
        assert!(summary.is_success());
        assert_eq!(panel.lock().statuses(), vec![StepStatus::Completed; 3]);
        drop(runner);

        let mut finished = false;
        while let Some(event) = rx.recv().await {
            finished |= matches!(event, WorkflowEvent::RunFinished(_));
        }
        assert!(finished);
    }

    #[tokio::test]
    async fn test_cancel_marks_step_failed() {
        let panel = WorkflowPanel::new(
            "q",
            vec![
                WorkflowStep::new("a", "A", StepModel::ChatGpt),
                WorkflowStep::new("b", "B", StepModel::Gemini),
            ],
        )
        .shared();
        let runner = runner(&panel, SimulatedBackend::new(Duration::from_secs(30)));
        let (handle, token) = CancelHandle::new();

        let run = tokio::spawn(async move { runner.execute_all(token).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        let summary = run.await.unwrap().unwrap();
        assert!(summary.cancelled);
        let panel = panel.lock();
        assert_eq!(panel.statuses(), vec![StepStatus::Failed, StepStatus::Pending]);
        assert_eq!(panel.step(0).unwrap().error.as_deref(), Some("cancelled"));
        assert!(!panel.is_running());
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels() {
        let panel = WorkflowPanel::attendance_report().shared();
        let runner = runner(&panel, SimulatedBackend::new(Duration::from_secs(30)));
        let (handle, token) = CancelHandle::new();
        drop(handle);

        let summary = runner.execute_all(token).await.unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.pending, 3);
    }

    #[tokio::test]
    async fn test_events_are_emitted() {
        let panel = WorkflowPanel::attendance_report().shared();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = runner(&panel, SimulatedBackend::new(Duration::ZERO)).with_events(tx);
        runner.execute_all(CancelToken::never()).await.unwrap();
        drop(runner);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert!(matches!(events.first(), Some(WorkflowEvent::RunStarted { run: 1, .. })));
        assert!(matches!(events.last(), Some(WorkflowEvent::RunFinished(s)) if s.completed == 3));
        assert_eq!(events.len(), 8);
    }
}
