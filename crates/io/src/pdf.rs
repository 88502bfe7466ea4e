//! PDF guest-list import.
//!
//! Guest-list PDFs are tables flattened to text: an optional row index, a
//! payment/RSVP status column, the guest's name and their email, separated by
//! column padding. Only email and name are recovered.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use justiguide_core::normalize::{collapse_whitespace, normalize_email};
use justiguide_core::{Contact, SourceLabels};

use crate::error::ExtractError;

/// Status words that appear as their own column and are never names.
pub const STATUS_WORDS: &[&str] = &["PAID", "UNPAID", "Going", "Maybe", "Invited", "Error"];

/// Emails containing this are template placeholders.
pub const PLACEHOLDER_DOMAIN: &str = "example.com";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static COLUMN_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}|\t|\|").expect("valid column regex"));

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid numeric regex"));

static ROW_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]?$").expect("valid row index regex"));

static LEADING_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]?\s*").expect("valid index regex"));

static TRAILING_STATUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\b(PAID|UNPAID|Going|Maybe|Invited|Error)\s*$").expect("valid status regex")
});

/// How document text is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfBackend {
    /// `pdftotext` when it is on `PATH`, otherwise `embedded`.
    #[default]
    Auto,
    /// In-process extraction via `pdf-extract`. Table cells come out
    /// separated by a single space.
    Embedded,
    /// poppler's `pdftotext -layout`, which keeps column padding intact.
    Pdftotext,
}

impl PdfBackend {
    /// Concrete backend for this machine.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if which::which("pdftotext").is_ok() => Self::Pdftotext,
            Self::Auto => Self::Embedded,
            other => other,
        }
    }
}

impl std::fmt::Display for PdfBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Embedded => write!(f, "embedded"),
            Self::Pdftotext => write!(f, "pdftotext"),
        }
    }
}

/// Full document text, pages in order.
pub fn extract_text(path: &Path, backend: PdfBackend) -> Result<String, ExtractError> {
    let backend = backend.resolve();
    debug!(path = %path.display(), %backend, "extracting pdf text");
    match backend {
        PdfBackend::Pdftotext => run_pdftotext(path),
        PdfBackend::Embedded | PdfBackend::Auto => extract_embedded(path),
    }
}

fn extract_embedded(path: &Path) -> Result<String, ExtractError> {
    // pdf-extract can panic on malformed PDFs
    let path_buf = path.to_path_buf();
    let result = std::panic::catch_unwind(move || pdf_extract::extract_text(&path_buf));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
        Err(_) => {
            warn!(path = %path.display(), "pdf extractor panicked");
            Err(ExtractError::Pdf {
                path: path.display().to_string(),
                message: "extractor panicked (malformed file)".to_string(),
            })
        }
    }
}

/// Run `pdftotext -layout <file> -` and capture stdout.
fn run_pdftotext(path: &Path) -> Result<String, ExtractError> {
    which::which("pdftotext").map_err(|_| ExtractError::PdftotextMissing)?;

    let pdf_err = |message: String| ExtractError::Pdf {
        path: path.display().to_string(),
        message,
    };

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| pdf_err(format!("failed to run pdftotext: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(pdf_err(format!(
            "pdftotext failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            stderr.trim(),
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A guest recovered from one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestLine {
    pub email: String,
    pub name: String,
}

/// Parse a single text line. `None` if it has no email or no usable name.
pub fn parse_line(line: &str) -> Option<GuestLine> {
    let m = EMAIL.find(line)?;
    let email = normalize_email(m.as_str())?;
    let name = guest_name(&line[..m.start()])?;
    Some(GuestLine { email, name })
}

/// Build contacts from extracted PDF text, keeping the first line per email.
pub fn extract_contacts(text: &str, labels: &SourceLabels) -> Vec<Contact> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut contacts = Vec::new();

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let Some(guest) = parse_line(line) else {
            continue;
        };
        if guest.email.contains(PLACEHOLDER_DOMAIN) || seen.contains(&guest.email) {
            continue;
        }
        seen.insert(guest.email.clone());
        contacts.push(Contact::new(guest.email, labels).with_full_name(&guest.name));
    }

    contacts
}

fn is_status_word(token: &str) -> bool {
    STATUS_WORDS.iter().any(|w| w.eq_ignore_ascii_case(token))
}

fn is_name_candidate(token: &str) -> bool {
    !NUMERIC.is_match(token)
        && !is_status_word(token)
        && token.chars().any(char::is_alphabetic)
        && token.chars().count() > 1
}

/// Drop a leading row index and status words that survived as part of the
/// name, as happens when the extractor joins cells with single spaces
/// (`3 PAID Jane Doe`). At least one word is always kept.
fn strip_row_labels(name: &str) -> String {
    let mut words: Vec<&str> = name.split(' ').filter(|w| !w.is_empty()).collect();

    let mut start = 0;
    while start + 1 < words.len() && is_row_label(words[start]) {
        start += 1;
    }
    words.drain(..start);

    while words.len() > 1 && words.last().is_some_and(|w| is_status_word(w)) {
        words.pop();
    }

    words.join(" ")
}

fn is_row_label(word: &str) -> bool {
    is_status_word(word) || ROW_INDEX.is_match(word)
}

fn guest_name(prefix: &str) -> Option<String> {
    let candidate = COLUMN_GAP
        .split(prefix)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .find(|t| is_name_candidate(t))
        .map(str::to_string)
        .unwrap_or_else(|| {
            let stripped = LEADING_INDEX.replace(prefix, "");
            TRAILING_STATUS.replace(&stripped, "").into_owned()
        });

    let unquoted = candidate.trim().trim_matches(|c| {
        matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}')
    });
    let name = strip_row_labels(&collapse_whitespace(unquoted));

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
