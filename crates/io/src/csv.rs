// CSV guest-list import

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use justiguide_core::normalize::{non_empty, normalize_email, normalize_linkedin, split_full_name};
use justiguide_core::{Contact, SourceLabels};

use crate::error::ExtractError;

// ---------------------------------------------------------------------------
// Column aliases, in priority order
// ---------------------------------------------------------------------------

pub const EMAIL_COLUMNS: &[&str] = &[
    "email",
    "Email",
    "Email?",
    "What's your email?",
    "What\u{2019}s your email?",
    "What\u{2018}s your email?",
    "What\u{02BC}s your email?",
    "What&#39;s your email?",
];

pub const FIRST_NAME_COLUMNS: &[&str] = &["first_name", "First Name", "FirstName"];

pub const LAST_NAME_COLUMNS: &[&str] = &["last_name", "Last Name", "LastName"];

pub const FULL_NAME_COLUMNS: &[&str] = &["name", "Name"];

pub const COMPANY_COLUMNS: &[&str] = &["What company do you work for?", "company", "Company"];

pub const LINKEDIN_COLUMNS: &[&str] = &[
    "What is your LinkedIn profile?",
    "linkedin",
    "LinkedIn",
    "LinkedIn Profile",
];

pub const PHONE_COLUMNS: &[&str] = &["phone_number", "phone", "Phone"];

/// One data row keyed by (trimmed) header name.
pub type CsvRow = HashMap<String, String>;

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, ExtractError> {
    let read_err = |e: std::io::Error| ExtractError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse header-aware CSV into row maps. Fields are trimmed, blank lines skipped,
/// ragged rows tolerated.
pub fn parse_rows(content: &str) -> Result<Vec<CsvRow>, ExtractError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let mut row = CsvRow::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            if let Some(val) = record.get(i) {
                row.insert(h.clone(), val.to_string());
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// First alias whose value is non-empty.
pub fn lookup<'a>(row: &'a CsvRow, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

/// Build contacts from a CSV guest list, keeping the first row per email.
pub fn extract_contacts(content: &str, labels: &SourceLabels) -> Result<Vec<Contact>, ExtractError> {
    let rows = parse_rows(content)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut contacts = Vec::new();

    for row in &rows {
        let Some(email) = lookup(row, EMAIL_COLUMNS).and_then(normalize_email) else {
            continue;
        };
        if !seen.insert(email.clone()) {
            continue;
        }
        contacts.push(contact_from_row(row, email, labels));
    }

    Ok(contacts)
}

fn contact_from_row(row: &CsvRow, email: String, labels: &SourceLabels) -> Contact {
    let mut contact = Contact::new(email, labels);

    let first = lookup(row, FIRST_NAME_COLUMNS).and_then(non_empty);
    let last = lookup(row, LAST_NAME_COLUMNS).and_then(non_empty);
    if first.is_some() || last.is_some() {
        contact.first_name = first;
        contact.last_name = last;
    } else if let Some(full) = lookup(row, FULL_NAME_COLUMNS) {
        let (first, last) = split_full_name(full);
        contact.first_name = first;
        contact.last_name = last;
    }

    contact.company = lookup(row, COMPANY_COLUMNS).and_then(non_empty);
    contact.linkedin = lookup(row, LINKEDIN_COLUMNS).and_then(normalize_linkedin);
    contact.phone = lookup(row, PHONE_COLUMNS).and_then(non_empty);

    contact
}

/// File name without directory or extension, used as the raw event name.
pub fn event_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn labels() -> SourceLabels {
        SourceLabels::new("Sunday Service Community", "Rooftop Mixer")
    }

    #[test]
    fn rows_without_at_sign_skipped() {
        let csv = "\
email,name
no-at-sign,Jane Doe
,Nobody
ok@x.com,Ok Person
";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].email, "ok@x.com");
    }

    #[test]
    fn first_row_wins_within_file() {
        let csv = "\
Email,Company,Phone
Jane@X.com,Acme,
jane@x.com ,Other,555-0100
";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].company.as_deref(), Some("Acme"));
        // Intra-file duplicates do not fill gaps
        assert_eq!(contacts[0].phone, None);
    }

    #[test]
    fn survey_columns_take_priority() {
        let csv = "\
What\u{2019}s your email?,company,What company do you work for?,LinkedIn,What is your LinkedIn profile?
jd@x.com,Fallback Co,Survey Co,linkedin.com/in/fallback,https://www.linkedin.com/in/jdoe/?utm=1
";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts.len(), 1);
        let c = &contacts[0];
        assert_eq!(c.company.as_deref(), Some("Survey Co"));
        assert_eq!(c.linkedin.as_deref(), Some("https://linkedin.com/in/jdoe"));
    }

    #[test]
    fn empty_alias_falls_through() {
        let csv = "\
email,Email,What is your LinkedIn profile?,linkedin
,second@x.com,,linkedin.com/company/acme
";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts[0].email, "second@x.com");
        assert_eq!(contacts[0].linkedin.as_deref(), Some("linkedin.com/company/acme"));
    }

    #[test]
    fn split_name_columns_preferred_over_full_name() {
        let csv = "\
email,first_name,last_name,name
a@x.com,Ann,,Ignored Name
b@x.com,,,Bob van Dyke
c@x.com,,,
";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts[0].first_name.as_deref(), Some("Ann"));
        assert_eq!(contacts[0].last_name, None);
        assert_eq!(contacts[1].first_name.as_deref(), Some("Bob"));
        assert_eq!(contacts[1].last_name.as_deref(), Some("van Dyke"));
        assert_eq!(contacts[2].first_name, None);
        assert_eq!(contacts[2].last_name, None);
    }

    #[test]
    fn non_linkedin_urls_dropped() {
        let csv = "email,linkedin\na@x.com,facebook.com/jdoe\n";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts[0].linkedin, None);
    }

    #[test]
    fn labels_applied() {
        let csv = "email\na@x.com\n";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts[0].source, "Sunday Service Community - Rooftop Mixer");
        assert_eq!(contacts[0].notes.as_deref(), Some("Attended: Rooftop Mixer"));
    }

    #[test]
    fn placeholder_emails_not_filtered() {
        let csv = "email\nguest@example.com\n";
        let contacts = extract_contacts(csv, &labels()).unwrap();
        assert_eq!(contacts.len(), 1);
    }

    #[test]
    fn blank_lines_bom_and_ragged_rows() {
        let csv = "\u{feff}email , phone\n\n  a@x.com , 555 \n\nb@x.com\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("email").map(String::as_str), Some("a@x.com"));
        assert_eq!(rows[0].get("phone").map(String::as_str), Some("555"));
        assert!(rows[1].get("phone").is_none());
    }

    #[test]
    fn windows_1252_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guests.csv");
        // "Caf\xe9" in Windows-1252
        std::fs::write(&path, b"email,company\na@x.com,Caf\xe9\n").unwrap();

        let content = read_file_as_utf8(&path).unwrap();
        let contacts = extract_contacts(&content, &labels()).unwrap();
        assert_eq!(contacts[0].company.as_deref(), Some("Caf\u{e9}"));
    }

    #[test]
    fn event_stem_strips_extension() {
        let path = PathBuf::from(
            "data/imports/Founder Beach Club_ Summer Of Rho \u{1F305} - Guests - 2025-07-31-16-27-05.csv",
        );
        assert_eq!(
            event_stem(&path),
            "Founder Beach Club_ Summer Of Rho \u{1F305} - Guests - 2025-07-31-16-27-05"
        );
    }
}
