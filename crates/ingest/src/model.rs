use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use justiguide_core::{Contact, ContactSummary};
use justiguide_io::SnapshotError;

// ---------------------------------------------------------------------------
// Per-source outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Csv,
    Pdf,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

/// What one input file contributed to a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Loaded(Vec<Contact>),
    /// File absent on this deployment.
    Skipped(String),
    /// File present but unusable; the run continues without it.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded,
    Skipped,
    Failed,
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl SourceOutcome {
    pub fn status(&self) -> SourceStatus {
        match self {
            Self::Loaded(_) => SourceStatus::Loaded,
            Self::Skipped(_) => SourceStatus::Skipped,
            Self::Failed(_) => SourceStatus::Failed,
        }
    }

    /// Contacts contributed, empty unless loaded.
    pub fn into_contacts(self) -> Vec<Contact> {
        match self {
            Self::Loaded(contacts) => contacts,
            Self::Skipped(_) | Self::Failed(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub path: String,
    pub event: String,
    pub status: SourceStatus,
    pub contacts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SourceReport {
    pub fn new(kind: SourceKind, path: String, event: String, outcome: &SourceOutcome) -> Self {
        let (contacts, reason) = match outcome {
            SourceOutcome::Loaded(c) => (c.len(), None),
            SourceOutcome::Skipped(r) | SourceOutcome::Failed(r) => (0, Some(r.clone())),
        };
        Self {
            kind,
            path,
            event,
            status: outcome.status(),
            contacts,
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Run + Report
// ---------------------------------------------------------------------------

/// Merged result of one ingestion pass, before persistence.
#[derive(Debug, Clone)]
pub struct ImportRun {
    pub group_name: String,
    pub contacts: Vec<Contact>,
    pub summary: ContactSummary,
    pub sources: Vec<SourceReport>,
    pub run_at: DateTime<Utc>,
}

/// Caller-facing result. Parsing success and snapshot success are reported
/// independently: a failed write still yields `success: true` with a warning.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub group_name: String,
    pub total_contacts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub summary: ContactSummary,
    pub sample_contacts: Vec<Contact>,
}

pub const SNAPSHOT_WARNING: &str = "Contacts parsed but could not be saved to file";

impl ImportReport {
    pub fn from_run(
        run: &ImportRun,
        persisted: Result<PathBuf, SnapshotError>,
        sample_size: usize,
    ) -> Self {
        let (saved_to, warning, error) = match persisted {
            Ok(path) => (Some(path.display().to_string()), None, None),
            Err(e) => (None, Some(SNAPSHOT_WARNING.to_string()), Some(e.message)),
        };

        Self {
            success: true,
            group_name: run.group_name.clone(),
            total_contacts: run.contacts.len(),
            saved_to,
            warning,
            error,
            summary: run.summary,
            sample_contacts: run.contacts.iter().take(sample_size).cloned().collect(),
        }
    }
}
