use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use justiguide_core::{ContactSummary, SourceLabels};
use justiguide_io::snapshot::{write_snapshot, Snapshot};
use justiguide_io::{csv, pdf, ExtractError, SnapshotError};

use crate::config::ImportConfig;
use crate::error::IngestError;
use crate::merge::merge_batches;
use crate::model::{ImportReport, ImportRun, SourceKind, SourceOutcome, SourceReport};

/// Load every configured source and merge. Relative paths resolve against `base_dir`.
///
/// Missing files are skipped and unreadable PDFs are reported as failed; a
/// CSV that exists but cannot be read or parsed aborts the run.
pub fn run(config: &ImportConfig, base_dir: &Path) -> Result<ImportRun, IngestError> {
    let events = config.event_table();
    let mut reports = Vec::with_capacity(config.sources.len());
    let mut batches = Vec::with_capacity(config.sources.len());

    for rel in &config.sources.csv {
        let path = base_dir.join(rel);
        let event = events.canonicalize(&csv::event_stem(&path));
        let labels = SourceLabels::new(&config.group_name, &event);

        let outcome = load_csv_source(&path, &labels)?;
        log_outcome(SourceKind::Csv, &path, &outcome);
        reports.push(SourceReport::new(SourceKind::Csv, display(rel), event, &outcome));
        batches.push(outcome.into_contacts());
    }

    for rel in &config.sources.pdf {
        let path = base_dir.join(rel);
        let labels = SourceLabels::new(&config.group_name, &config.pdf_event);

        let outcome = load_pdf_source(&path, &labels, config);
        log_outcome(SourceKind::Pdf, &path, &outcome);
        reports.push(SourceReport::new(
            SourceKind::Pdf,
            display(rel),
            config.pdf_event.clone(),
            &outcome,
        ));
        batches.push(outcome.into_contacts());
    }

    let contacts = merge_batches(batches);
    let summary = ContactSummary::from_contacts(&contacts);

    info!(
        group = %config.group_name,
        total = contacts.len(),
        with_company = summary.with_company,
        with_linkedin = summary.with_linkedin,
        with_phone = summary.with_phone,
        "merged contacts"
    );

    Ok(ImportRun {
        group_name: config.group_name.clone(),
        contacts,
        summary,
        sources: reports,
        run_at: Utc::now(),
    })
}

/// Read one CSV guest list.
pub fn load_csv_source(path: &Path, labels: &SourceLabels) -> Result<SourceOutcome, IngestError> {
    if !path.exists() {
        return Ok(SourceOutcome::Skipped("file not found".into()));
    }

    let wrap = |source: ExtractError| IngestError::Csv {
        path: path.display().to_string(),
        source,
    };
    let content = csv::read_file_as_utf8(path).map_err(wrap)?;
    let contacts = csv::extract_contacts(&content, labels).map_err(wrap)?;
    Ok(SourceOutcome::Loaded(contacts))
}

/// Read one PDF guest list. Never fails the run.
pub fn load_pdf_source(path: &Path, labels: &SourceLabels, config: &ImportConfig) -> SourceOutcome {
    if !path.exists() {
        return SourceOutcome::Skipped("file not found".into());
    }

    match pdf::extract_text(path, config.pdf.backend) {
        Ok(text) => SourceOutcome::Loaded(pdf::extract_contacts(&text, labels)),
        Err(e) => SourceOutcome::Failed(e.to_string()),
    }
}

/// Write the run's snapshot under the configured output directory.
pub fn persist(
    run: &ImportRun,
    config: &ImportConfig,
    base_dir: &Path,
    at: DateTime<Utc>,
) -> Result<PathBuf, SnapshotError> {
    let dir = base_dir.join(&config.output.dir);
    let snapshot = Snapshot::new(&run.group_name, &run.contacts, at);
    write_snapshot(&dir, &config.output.file_prefix, &snapshot, at)
}

/// Full pass: load, merge, persist, and build the caller-facing report.
pub fn import_group(config: &ImportConfig, base_dir: &Path) -> Result<(ImportRun, ImportReport), IngestError> {
    let run = run(config, base_dir)?;

    let persisted = persist(&run, config, base_dir, run.run_at);
    match persisted {
        Ok(ref path) => info!(path = %path.display(), "saved contact snapshot"),
        Err(ref e) => warn!(error = %e, "contact snapshot not saved"),
    }

    let report = ImportReport::from_run(&run, persisted, config.output.sample_size);
    Ok((run, report))
}

fn log_outcome(kind: SourceKind, path: &Path, outcome: &SourceOutcome) {
    match outcome {
        SourceOutcome::Loaded(contacts) => {
            debug!(%kind, path = %path.display(), contacts = contacts.len(), "loaded source")
        }
        SourceOutcome::Skipped(reason) => {
            debug!(%kind, path = %path.display(), reason = %reason, "skipped source")
        }
        SourceOutcome::Failed(reason) => {
            warn!(%kind, path = %path.display(), reason = %reason, "source failed, continuing")
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(csv: &[&str], pdf: &[&str]) -> ImportConfig {
        let mut config = ImportConfig::default();
        config.sources.csv = csv.iter().map(PathBuf::from).collect();
        config.sources.pdf = pdf.iter().map(PathBuf::from).collect();
        config
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("present.csv"), "email\na@b.com\n").unwrap();

        let config = config_for(&["absent.csv", "present.csv"], &["absent.pdf"]);
        let run = run(&config, dir.path()).unwrap();

        assert_eq!(run.contacts.len(), 1);
        let statuses: Vec<String> = run.sources.iter().map(|s| s.status.to_string()).collect();
        assert_eq!(statuses, vec!["skipped", "loaded", "skipped"]);
    }

    #[test]
    fn broken_pdf_does_not_abort() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("guests.csv"), "email\na@b.com\n").unwrap();
        fs::write(dir.path().join("guests.pdf"), b"%PDF-1.7 garbage").unwrap();

        let config = config_for(&["guests.csv"], &["guests.pdf"]);
        let run = run(&config, dir.path()).unwrap();

        assert_eq!(run.contacts.len(), 1);
        let pdf = &run.sources[1];
        assert_eq!(pdf.kind, SourceKind::Pdf);
        assert_eq!(pdf.status.to_string(), "failed");
        assert!(pdf.reason.is_some());
    }

    #[test]
    fn malformed_csv_aborts() {
        let dir = tempdir().unwrap();
        // Exists but cannot be read as a file
        fs::create_dir(dir.path().join("guests.csv")).unwrap();

        let config = config_for(&["guests.csv"], &[]);
        let err = run(&config, dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::Csv { .. }));
    }

    #[test]
    fn csv_event_comes_from_file_name() {
        let dir = tempdir().unwrap();
        let name = "Founder Beach Club_ Summer Of Rho \u{1F305} - Guests - 2025-07-31-16-27-05.csv";
        fs::write(dir.path().join(name), "email\na@b.com\n").unwrap();

        let config = config_for(&[name], &[]);
        let run = run(&config, dir.path()).unwrap();
        assert_eq!(run.sources[0].event, "Founder Beach Club - Summer Of Rho");
        assert_eq!(
            run.contacts[0].source,
            "Sunday Service Community - Founder Beach Club - Summer Of Rho"
        );
    }

    #[test]
    fn import_group_persists_snapshot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "email,company\na@b.com,Acme\n").unwrap();

        let config = config_for(&["a.csv"], &[]);
        let (_, report) = import_group(&config, dir.path()).unwrap();

        let saved = report.saved_to.expect("snapshot path");
        assert!(saved.contains("sunday-service-contacts-"));
        assert!(Path::new(&saved).exists());
        assert_eq!(report.summary.with_company, 1);
    }

    #[test]
    fn import_group_survives_snapshot_failure() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "email\na@b.com\n").unwrap();
        // Output dir path occupied by a file
        fs::write(dir.path().join("blocked"), "x").unwrap();

        let mut config = config_for(&["a.csv"], &[]);
        config.output.dir = PathBuf::from("blocked");
        let (_, report) = import_group(&config, dir.path()).unwrap();

        assert!(report.success);
        assert!(report.saved_to.is_none());
        assert!(report.warning.is_some());
        assert!(report.error.is_some());
        assert_eq!(report.total_contacts, 1);
    }
}
