use serde::Deserialize;

/// One entry from the catalog listing. Only `SOURCE` containers are source
/// definitions; folders and spaces share the same listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(rename = "containerType")]
    pub container_type: String,
}

/// 目錄中一筆受管來源的連線定義。`id` 在改名後仍然不變，
/// `name` 是設定檔查找用的鍵。
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedSource {
    pub id: String,
    pub name: String,
    pub source_type: String,
    pub hostname: String,
    pub port: u16,
    pub instance: Option<String>,
    pub username: String,
    pub use_encryption: bool,
}

/// Short-lived catalog session token. Lives for one run, never persisted.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Connect,
    ExternalChange,
    CatalogUpdate,
    CatalogQuery,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Connect => "connect",
            FailureStage::ExternalChange => "external-change",
            FailureStage::CatalogUpdate => "catalog-update",
            FailureStage::CatalogQuery => "catalog-query",
        }
    }
}

/// What happened to one source during a run.
#[derive(Clone, PartialEq)]
pub enum RotationOutcome {
    Skipped { reason: String },
    Succeeded { new_password: String },
    Failed { stage: FailureStage, cause: String },
}

impl std::fmt::Debug for RotationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationOutcome::Skipped { reason } => {
                f.debug_struct("Skipped").field("reason", reason).finish()
            }
            RotationOutcome::Succeeded { .. } => f
                .debug_struct("Succeeded")
                .field("new_password", &"<redacted>")
                .finish(),
            RotationOutcome::Failed { stage, cause } => f
                .debug_struct("Failed")
                .field("stage", stage)
                .field("cause", cause)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub outcome: RotationOutcome,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<SourceReport>,
}

impl RunSummary {
    pub fn record(&mut self, source: String, outcome: RotationOutcome) {
        self.reports.push(SourceReport { source, outcome });
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, RotationOutcome::Succeeded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RotationOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RotationOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&RotationOutcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_shows_secrets() {
        let token = SessionToken::new("super-secret-token".to_string());
        assert_eq!(format!("{:?}", token), "SessionToken(<redacted>)");

        let outcome = RotationOutcome::Succeeded {
            new_password: "Ab3!xZ9q#2".to_string(),
        };
        let rendered = format!("{:?}", outcome);
        assert!(!rendered.contains("Ab3!xZ9q#2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(
            "a".to_string(),
            RotationOutcome::Succeeded {
                new_password: "x".to_string(),
            },
        );
        summary.record(
            "b".to_string(),
            RotationOutcome::Skipped {
                reason: "missing config entry".to_string(),
            },
        );
        summary.record(
            "c".to_string(),
            RotationOutcome::Failed {
                stage: FailureStage::Connect,
                cause: "boom".to_string(),
            },
        );

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
    }
}
