use std::fmt;

#[derive(Debug)]
pub enum ExtractError {
    /// File exists but could not be read.
    Read { path: String, message: String },
    /// CSV framing or header error.
    Csv { line: Option<u64>, message: String },
    /// PDF text extraction failed (malformed file, extractor panic).
    Pdf { path: String, message: String },
    /// `pdftotext` backend selected but the binary is not on PATH.
    PdftotextMissing,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Csv { line: Some(line), message } => {
                write!(f, "CSV error on line {line}: {message}")
            }
            Self::Csv { line: None, message } => write!(f, "CSV error: {message}"),
            Self::Pdf { path, message } => write!(f, "PDF extraction failed for {path}: {message}"),
            Self::PdftotextMissing => write!(f, "pdftotext not installed (poppler-utils)"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<csv::Error> for ExtractError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        Self::Csv { line, message: e.to_string() }
    }
}

/// Snapshot could not be persisted. Never fatal to an import run.
#[derive(Debug)]
pub struct SnapshotError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot write snapshot {}: {}", self.path, self.message)
    }
}

impl std::error::Error for SnapshotError {}
