use crate::core::model::{RotationOutcome, RunSummary};
use crate::utils::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One JSON line per source outcome. The generated secret is never written
/// here; the config store is its only durable home.
#[derive(Serialize)]
struct AuditRecord<'a> {
    timestamp: String,
    source: &'a str,
    outcome: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

pub fn append_run<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    for report in &summary.reports {
        let (outcome, stage, detail) = match &report.outcome {
            RotationOutcome::Succeeded { .. } => ("succeeded", None, None),
            RotationOutcome::Skipped { reason } => ("skipped", None, Some(reason.as_str())),
            RotationOutcome::Failed { stage, cause } => {
                ("failed", Some(stage.as_str()), Some(cause.as_str()))
            }
        };

        let record = AuditRecord {
            timestamp: Utc::now().to_rfc3339(),
            source: &report.source,
            outcome,
            stage,
            detail,
        };
        serde_json::to_writer(&mut file, &record)?;
        file.write_all(b"\n")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FailureStage;
    use tempfile::TempDir;

    #[test]
    fn test_appends_one_line_per_outcome_without_secrets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");

        let mut summary = RunSummary::default();
        summary.record(
            "analytics_pg".to_string(),
            RotationOutcome::Succeeded {
                new_password: "Ab3!xZ9q#2".to_string(),
            },
        );
        summary.record(
            "reporting_pg".to_string(),
            RotationOutcome::Skipped {
                reason: "missing config entry".to_string(),
            },
        );
        summary.record(
            "archive_pg".to_string(),
            RotationOutcome::Failed {
                stage: FailureStage::CatalogUpdate,
                cause: "status 500".to_string(),
            },
        );

        append_run(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(!content.contains("Ab3!xZ9q#2"));

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["source"], "analytics_pg");
        assert_eq!(first["outcome"], "succeeded");
        assert!(first.get("stage").is_none());

        let third: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(third["outcome"], "failed");
        assert_eq!(third["stage"], "catalog-update");
    }

    #[test]
    fn test_consecutive_runs_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");

        let mut summary = RunSummary::default();
        summary.record(
            "analytics_pg".to_string(),
            RotationOutcome::Skipped {
                reason: "missing config entry".to_string(),
            },
        );

        append_run(&path, &summary).unwrap();
        append_run(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
