use std::path::{Path, PathBuf};

use justiguide_ingest::config::ImportConfig;
use justiguide_ingest::engine::{import_group, run};
use justiguide_ingest::model::{SourceKind, SourceStatus, SNAPSHOT_WARNING};
use justiguide_ingest::IngestError;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn founders_config() -> ImportConfig {
    ImportConfig::from_path(&fixtures_dir().join("founders.toml")).unwrap()
}

/// Same config, but snapshots land in `out` instead of the fixtures dir.
fn founders_config_writing_to(out: &Path) -> ImportConfig {
    let mut config = founders_config();
    config.output.dir = out.to_path_buf();
    config
}

// -------------------------------------------------------------------------
// Merge across files
// -------------------------------------------------------------------------

#[test]
fn same_email_across_files_becomes_one_contact() {
    let result = run(&founders_config(), &fixtures_dir()).unwrap();

    let emails: Vec<&str> = result.contacts.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(emails, vec!["a@b.com", "grace@navy.mil", "kj@nasa.gov"]);

    let ada = &result.contacts[0];
    assert_eq!(ada.first_name.as_deref(), Some("Ada"));
    assert_eq!(ada.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(ada.company.as_deref(), Some("Acme"));
    assert_eq!(ada.linkedin.as_deref(), Some("https://linkedin.com/in/ada"));
    assert_eq!(
        ada.source,
        "Founders Network - Rooftop Mixer; Founders Network - Immigrant Founders Mixer"
    );
    assert_eq!(
        ada.notes.as_deref(),
        Some("Attended: Rooftop Mixer; Attended: Immigrant Founders Mixer")
    );
}

#[test]
fn within_file_duplicate_keeps_first_row() {
    let result = run(&founders_config(), &fixtures_dir()).unwrap();
    // Second a@b.com row in the rooftop list names "Other Co"
    assert_eq!(result.contacts[0].company.as_deref(), Some("Acme"));
    assert_eq!(result.sources[0].contacts, 2);
}

#[test]
fn summary_counts_merged_contacts() {
    let result = run(&founders_config(), &fixtures_dir()).unwrap();
    assert_eq!(result.summary.with_email, 3);
    assert_eq!(result.summary.with_company, 1);
    assert_eq!(result.summary.with_linkedin, 2);
    assert_eq!(result.summary.with_phone, 1);
}

#[test]
fn missing_sources_are_reported_not_fatal() {
    let result = run(&founders_config(), &fixtures_dir()).unwrap();

    let statuses: Vec<(SourceKind, SourceStatus)> =
        result.sources.iter().map(|s| (s.kind, s.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (SourceKind::Csv, SourceStatus::Loaded),
            (SourceKind::Csv, SourceStatus::Loaded),
            (SourceKind::Csv, SourceStatus::Skipped),
            (SourceKind::Pdf, SourceStatus::Skipped),
        ]
    );
    assert_eq!(result.sources[1].event, "Immigrant Founders Mixer");
    assert_eq!(result.sources[3].event, "Sunday Service");
}

#[test]
fn pdf_guests_merge_after_csv_guests() {
    let mut config = founders_config();
    config.sources.csv = vec![PathBuf::from("Rooftop Mixer - Guests - 2025-08-09-19-00-00.csv")];
    config.sources.pdf = vec![PathBuf::from("Sunday Service - Guest List.pdf")];

    let result = run(&config, &fixtures_dir()).unwrap();

    assert_eq!(result.sources[1].kind, SourceKind::Pdf);
    assert_eq!(result.sources[1].status, SourceStatus::Loaded);
    // example.com row and the repeated JANE@x.com row are dropped
    assert_eq!(result.sources[1].contacts, 3);

    let emails: Vec<&str> = result.contacts.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(emails, vec!["a@b.com", "grace@navy.mil", "jane@x.com", "ada@engines.io"]);

    // Seen in both: CSV fields kept, PDF event appended
    let grace = &result.contacts[1];
    assert_eq!(grace.phone.as_deref(), Some("555-0199"));
    assert_eq!(grace.linkedin.as_deref(), Some("https://linkedin.com/in/ghopper"));
    assert_eq!(
        grace.source,
        "Founders Network - Rooftop Mixer; Founders Network - Sunday Service"
    );
    assert_eq!(
        grace.notes.as_deref(),
        Some("Attended: Rooftop Mixer; Attended: Sunday Service")
    );

    // PDF-only guests carry just a name
    let jane = &result.contacts[2];
    assert_eq!(jane.first_name.as_deref(), Some("Jane"));
    assert_eq!(jane.last_name.as_deref(), Some("Doe"));
    assert!(jane.company.is_none());
    assert_eq!(jane.source, "Founders Network - Sunday Service");
    assert_eq!(result.contacts[3].first_name.as_deref(), Some("Ada"));
}

// -------------------------------------------------------------------------
// Snapshot + report
// -------------------------------------------------------------------------

#[test]
fn import_writes_snapshot_with_every_contact() {
    let out = tempfile::tempdir().unwrap();
    let config = founders_config_writing_to(out.path());

    let (_, report) = import_group(&config, &fixtures_dir()).unwrap();
    assert!(report.success);
    assert_eq!(report.group_name, "Founders Network");
    assert_eq!(report.total_contacts, 3);
    assert_eq!(report.sample_contacts.len(), 2);

    let saved = PathBuf::from(report.saved_to.expect("saved path"));
    assert!(saved.starts_with(out.path()));
    let name = saved.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("founders-contacts-"));
    assert!(name.ends_with("Z.json"));
    assert!(!name.contains(':'));

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(doc["groupName"], "Founders Network");
    assert_eq!(doc["totalContacts"], 3);
    assert_eq!(doc["contacts"].as_array().unwrap().len(), 3);
    assert_eq!(doc["summary"]["withLinkedIn"], 2);
    assert_eq!(doc["contacts"][0]["email"], "a@b.com");
}

#[test]
fn unwritable_output_still_succeeds() {
    let scratch = tempfile::tempdir().unwrap();
    let blocked = scratch.path().join("not-a-dir");
    std::fs::write(&blocked, "occupied").unwrap();

    let config = founders_config_writing_to(&blocked);
    let (_, report) = import_group(&config, &fixtures_dir()).unwrap();

    assert!(report.success);
    assert_eq!(report.total_contacts, 3);
    assert!(report.saved_to.is_none());
    assert_eq!(report.warning.as_deref(), Some(SNAPSHOT_WARNING));

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("savedTo").is_none());
    assert!(json["error"].is_string());
}

// -------------------------------------------------------------------------
// Failures
// -------------------------------------------------------------------------

#[test]
fn broken_pdf_is_failed_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        fixtures_dir().join("Rooftop Mixer - Guests - 2025-08-09-19-00-00.csv"),
        dir.path().join("rooftop.csv"),
    )
    .unwrap();
    std::fs::write(dir.path().join("guests.pdf"), b"not a pdf at all").unwrap();

    let mut config = ImportConfig::default();
    config.sources.csv = vec![PathBuf::from("rooftop.csv")];
    config.sources.pdf = vec![PathBuf::from("guests.pdf")];

    let result = run(&config, dir.path()).unwrap();
    assert_eq!(result.contacts.len(), 2);
    assert_eq!(result.sources[1].status, SourceStatus::Failed);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[sources]\ncsv = []\npdf = []\n").unwrap();

    let err = ImportConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, IngestError::ConfigValidation(_)));
}

#[test]
fn missing_config_file_is_io_error() {
    let err = ImportConfig::from_path(&fixtures_dir().join("nope.toml")).unwrap_err();
    assert!(matches!(err, IngestError::Io(_)));
}
