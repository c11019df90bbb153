//! "Save Session" export.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::panel::WorkflowPanel;
use super::sources::{mock_sources, SourceCitation};
use super::step::WorkflowStep;
use crate::core::Result;

/// Serializable snapshot of a workflow panel.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub generated_at: DateTime<Utc>,
    pub query: String,
    pub history: Vec<String>,
    pub steps: Vec<WorkflowStep>,
    pub sources: Vec<SourceCitation>,
}

impl WorkflowReport {
    pub fn from_panel(panel: &WorkflowPanel) -> Self {
        Self {
            generated_at: Utc::now(),
            query: panel.query().to_string(),
            history: panel.history().to_vec(),
            steps: panel.steps().to_vec(),
            sources: mock_sources(),
        }
    }

    /// File name for this report, stamped with the generation time down to
    /// the millisecond. `attempt` above 1 adds a collision suffix.
    pub fn file_name(&self, attempt: u32) -> String {
        let stamp = self.generated_at.format("%Y%m%d-%H%M%S-%3f");
        if attempt > 1 {
            format!("workflow-{stamp}-{attempt}.json")
        } else {
            format!("workflow-{stamp}.json")
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir`. Existing reports are never overwritten.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let json = self.to_json()?;
        std::fs::create_dir_all(dir)?;

        let mut attempt = 1;
        loop {
            let path = dir.join(self.file_name(attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(json.as_bytes())?;
                    tracing::info!(path = %path.display(), "Exported workflow report");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Write the panel as pretty JSON into `dir`, creating it if needed.
pub fn export_report(panel: &WorkflowPanel, dir: &Path) -> Result<PathBuf> {
    WorkflowReport::from_panel(panel).save(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_report_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports");
        let mut panel = WorkflowPanel::attendance_report();
        panel.begin_run().unwrap();
        panel.finish_run();

        let path = export_report(&panel, &target).unwrap();
        assert!(path.starts_with(&target));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["steps"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["steps"][0]["status"], "pending");
        assert_eq!(json["steps"][0]["model"], "ChatGPT");
        assert_eq!(json["history"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["sources"][0]["relevance"], 95);
    }

    #[test]
    fn test_file_name_format() {
        let report = WorkflowReport::from_panel(&WorkflowPanel::attendance_report());
        let name = report.file_name(1);
        assert!(name.starts_with("workflow-"));
        assert!(name.ends_with(".json"));
        assert!(report.file_name(2).ends_with("-2.json"));
    }

    #[test]
    fn test_back_to_back_exports_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = WorkflowPanel::attendance_report();
        panel.set_query("first");
        let first = export_report(&panel, dir.path()).unwrap();
        panel.set_query("second");
        let second = export_report(&panel, dir.path()).unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
        assert!(std::fs::read_to_string(&first).unwrap().contains("\"first\""));
        assert!(std::fs::read_to_string(&second).unwrap().contains("\"second\""));
    }

    #[test]
    fn test_colliding_name_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let report = WorkflowReport::from_panel(&WorkflowPanel::attendance_report());

        let first = report.save(dir.path()).unwrap();
        let second = report.save(dir.path()).unwrap();
        let third = report.save(dir.path()).unwrap();

        assert_eq!(first, dir.path().join(report.file_name(1)));
        assert_eq!(second, dir.path().join(report.file_name(2)));
        assert_eq!(third, dir.path().join(report.file_name(3)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }
}
