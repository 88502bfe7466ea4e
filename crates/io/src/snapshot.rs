// JSON snapshot of a merged contact list

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use justiguide_core::{Contact, ContactSummary};

use crate::error::SnapshotError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub group_name: &'a str,
    pub exported_at: String,
    pub total_contacts: usize,
    pub contacts: &'a [Contact],
    pub summary: ContactSummary,
}

impl<'a> Snapshot<'a> {
    pub fn new(group_name: &'a str, contacts: &'a [Contact], exported_at: DateTime<Utc>) -> Self {
        Self {
            group_name,
            exported_at: iso_timestamp(exported_at),
            total_contacts: contacts.len(),
            contacts,
            summary: ContactSummary::from_contacts(contacts),
        }
    }
}

/// `2025-08-01T12:34:56.789Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `<prefix>-2025-08-01T12-34-56-789Z.json`
pub fn snapshot_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    let stamp = iso_timestamp(at).replace([':', '.'], "-");
    format!("{prefix}-{stamp}.json")
}

/// Write the snapshot into `dir`, creating it if needed. Returns the file path.
pub fn write_snapshot(
    dir: &Path,
    prefix: &str,
    snapshot: &Snapshot<'_>,
    at: DateTime<Utc>,
) -> Result<PathBuf, SnapshotError> {
    let path = dir.join(snapshot_file_name(prefix, at));
    let err = |message: String| SnapshotError {
        path: path.display().to_string(),
        message,
    };

    fs::create_dir_all(dir).map_err(|e| err(e.to_string()))?;

    let file = File::create(&path).map_err(|e| err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|e| err(e.to_string()))?;
    writer.flush().map_err(|e| err(e.to_string()))?;

    Ok(path)
}
