//! Workflow Integration Tests
//!
//! Drives the runner, panel and report export through the public API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use edumanage::workflow::{
    export_report, CancelHandle, CancelToken, FailurePolicy, SimulatedBackend, StepBackend,
    StepOutput, StepStatus, WorkflowEvent, WorkflowPanel, WorkflowRunner, WorkflowStep,
};
use edumanage::Result;

fn panel() -> edumanage::workflow::SharedPanel {
    WorkflowPanel::attendance_report().shared()
}

/// Backend that tags outputs and reports a fixed confidence.
struct EchoBackend;

#[async_trait]
impl StepBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(&self, step: &WorkflowStep, query: &str) -> Result<StepOutput> {
        Ok(StepOutput { text: format!("{}: {query}", step.id), confidence: Some(150) })
    }
}

#[tokio::test]
async fn test_events_follow_step_order() {
    let panel = panel();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runner = WorkflowRunner::new(Arc::clone(&panel), Arc::new(SimulatedBackend::new(Duration::ZERO)))
        .with_events(tx);

    let summary = runner.execute_all(CancelToken::never()).await.unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.run, Some(1));
    drop(runner);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert!(matches!(events.first(), Some(WorkflowEvent::RunStarted { run: 1, .. })));
    assert!(matches!(events.last(), Some(WorkflowEvent::RunFinished(_))));

    let started: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            WorkflowEvent::StepStarted { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_custom_backend_output_lands_in_panel() {
    let panel = panel();
    panel.lock().set_query("fee defaulters");
    let runner = WorkflowRunner::new(Arc::clone(&panel), Arc::new(EchoBackend));

    runner.execute_all(CancelToken::never()).await.unwrap();

    let panel = panel.lock();
    let step = panel.step(1).unwrap();
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.output.as_deref(), Some("step2: fee defaulters"));
    // Confidence is clamped to a percentage
    assert_eq!(step.confidence, Some(100));
    assert_eq!(panel.history(), ["fee defaulters".to_string()]);
}

#[tokio::test]
async fn test_halt_then_retry_after_fix() {
    let panel = panel();
    let failing = SimulatedBackend::new(Duration::ZERO).fail_on("step1");
    let runner = WorkflowRunner::new(Arc::clone(&panel), Arc::new(failing));

    let summary = runner.execute_all(CancelToken::never()).await.unwrap();
    assert_eq!((summary.completed, summary.failed, summary.pending), (0, 1, 2));
    {
        let panel = panel.lock();
        let error = panel.step(0).unwrap().error.clone().unwrap();
        assert!(error.contains("step1"), "{error}");
    }

    panel.lock().retry_step("step1").unwrap();
    assert_eq!(panel.lock().step(0).unwrap().status, StepStatus::Pending);

    let healthy = WorkflowRunner::new(Arc::clone(&panel), Arc::new(SimulatedBackend::new(Duration::ZERO)));
    let summary = healthy.execute_all(CancelToken::never()).await.unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.run, Some(2));
    assert_eq!(panel.lock().progress().completed, 3);
}

#[tokio::test]
async fn test_continue_policy_runs_remaining_steps() {
    let panel = panel();
    let backend = SimulatedBackend::new(Duration::ZERO).fail_on("step2");
    let runner = WorkflowRunner::new(Arc::clone(&panel), Arc::new(backend))
        .with_policy(FailurePolicy::Continue);

    let summary = runner.execute_all(CancelToken::never()).await.unwrap();
    assert_eq!((summary.completed, summary.failed, summary.pending), (2, 1, 0));
    assert_eq!(
        panel.lock().statuses(),
        vec![StepStatus::Completed, StepStatus::Failed, StepStatus::Completed]
    );
}

#[tokio::test]
async fn test_second_execute_is_skipped_while_running() {
    let panel = panel();
    let slow = WorkflowRunner::new(
        Arc::clone(&panel),
        Arc::new(SimulatedBackend::new(Duration::from_millis(50))),
    );
    let eager = WorkflowRunner::new(Arc::clone(&panel), Arc::new(SimulatedBackend::new(Duration::ZERO)));

    let (first, second) = tokio::join!(slow.execute_all(CancelToken::never()), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        eager.execute_all(CancelToken::never()).await
    });

    assert!(first.unwrap().is_success());
    let second = second.unwrap();
    assert!(second.skipped);
    assert_eq!(second.run, None);
    assert_eq!(panel.lock().history().len(), 1);
}

#[tokio::test]
async fn test_cancel_mid_step() {
    let panel = panel();
    let runner = WorkflowRunner::new(
        Arc::clone(&panel),
        Arc::new(SimulatedBackend::new(Duration::from_secs(5))),
    );
    let (handle, token) = CancelHandle::new();

    let (summary, ()) = tokio::join!(runner.execute_all(token), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let summary = summary.unwrap();
    assert!(summary.cancelled);
    assert!(!summary.is_success());

    let panel = panel.lock();
    assert!(!panel.is_running());
    assert_eq!(panel.step(0).unwrap().status, StepStatus::Failed);
    assert_eq!(panel.step(0).unwrap().error.as_deref(), Some("cancelled"));
    assert_eq!(panel.step(1).unwrap().status, StepStatus::Pending);
}

#[tokio::test]
async fn test_export_after_run() {
    let panel = panel();
    let runner = WorkflowRunner::new(Arc::clone(&panel), Arc::new(SimulatedBackend::new(Duration::ZERO)));
    runner.execute_all(CancelToken::never()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = export_report(&panel.lock(), &dir.path().join("nested")).unwrap();
    assert!(path.starts_with(dir.path()));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report["history"].as_array().unwrap().len(), 1);
    assert_eq!(report["steps"][2]["status"], "completed");
    assert!(!report["sources"].as_array().unwrap().is_empty());
}
