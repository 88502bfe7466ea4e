use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use justiguide_io::{EventRule, EventTable, PdfBackend};

use crate::error::IngestError;

pub const DEFAULT_GROUP_NAME: &str = "Sunday Service Community";
pub const DEFAULT_PDF_EVENT: &str = "Sunday Service";
pub const DEFAULT_OUTPUT_DIR: &str = "data/contacts";
pub const DEFAULT_FILE_PREFIX: &str = "sunday-service-contacts";
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Guest lists imported when no config file is given.
pub const DEFAULT_CSV_SOURCES: &[&str] = &[
    "data/imports/Founder Beach Club_ Summer Of Rho \u{1F305} - Guests - 2025-07-31-16-27-05.csv",
    "data/imports/SundaySwervice x Gunther's Birthday - Guests - 2025-08-02-10-12-44.csv",
    "data/imports/Sunday Swervice - Guests - 2025-07-20-09-03-17.csv",
    "data/imports/Immigrant Founders Happy Hour - Guests - 2025-06-12-18-40-02.csv",
];

pub const DEFAULT_PDF_SOURCES: &[&str] = &["data/imports/Sunday Service - Guest List.pdf"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_group_name")]
    pub group_name: String,
    /// Event label for PDF guest lists, which carry no usable file name.
    #[serde(default = "default_pdf_event")]
    pub pdf_event: String,
    #[serde(default)]
    pub sources: SourceList,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Evaluated before the built-in event table.
    #[serde(default)]
    pub event_rules: Vec<EventRule>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            group_name: default_group_name(),
            pdf_event: default_pdf_event(),
            sources: SourceList::default(),
            pdf: PdfConfig::default(),
            output: OutputConfig::default(),
            event_rules: Vec::new(),
        }
    }
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.into()
}

fn default_pdf_event() -> String {
    DEFAULT_PDF_EVENT.into()
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Input files, processed in order: every CSV, then every PDF.
///
/// An absent `[sources]` table means the built-in list; a present table only
/// imports what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceList {
    #[serde(default)]
    pub csv: Vec<PathBuf>,
    #[serde(default)]
    pub pdf: Vec<PathBuf>,
}

impl Default for SourceList {
    fn default() -> Self {
        Self {
            csv: DEFAULT_CSV_SOURCES.iter().map(PathBuf::from).collect(),
            pdf: DEFAULT_PDF_SOURCES.iter().map(PathBuf::from).collect(),
        }
    }
}

impl SourceList {
    pub fn len(&self) -> usize {
        self.csv.len() + self.pdf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// PDF + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub backend: PdfBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Contacts echoed back in the response; the snapshot always has all.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            sample_size: default_sample_size(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.into()
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ImportConfig {
    pub fn from_toml(input: &str) -> Result<Self, IngestError> {
        let config: ImportConfig =
            toml::from_str(input).map_err(|e| IngestError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| IngestError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.group_name.trim().is_empty() {
            return Err(IngestError::ConfigValidation("group_name must not be empty".into()));
        }

        if self.pdf_event.trim().is_empty() {
            return Err(IngestError::ConfigValidation("pdf_event must not be empty".into()));
        }

        if self.sources.is_empty() {
            return Err(IngestError::ConfigValidation(
                "at least one csv or pdf source is required".into(),
            ));
        }

        if self.output.file_prefix.trim().is_empty() {
            return Err(IngestError::ConfigValidation(
                "output.file_prefix must not be empty".into(),
            ));
        }

        if self.output.sample_size == 0 {
            return Err(IngestError::ConfigValidation(
                "output.sample_size must be at least 1".into(),
            ));
        }

        for (i, rule) in self.event_rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(IngestError::ConfigValidation(format!(
                    "event_rules[{i}]: name must not be empty"
                )));
            }
            let usable = !rule.triggers.is_empty()
                && rule.triggers.iter().all(|g| g.iter().any(|t| !t.is_empty()));
            if !usable {
                return Err(IngestError::ConfigValidation(format!(
                    "event_rules[{i}] ('{}'): every trigger group needs a non-empty substring",
                    rule.name
                )));
            }
        }

        Ok(())
    }

    pub fn event_table(&self) -> EventTable {
        EventTable::with_overrides(&self.event_rules)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
group_name = "Immigrant Founders Network"
pdf_event = "Friday Dinner"

[sources]
csv = ["guests/a.csv", "guests/b.csv"]
pdf = ["guests/dinner.pdf"]

[pdf]
backend = "pdftotext"

[output]
dir = "out"
file_prefix = "founders-contacts"
sample_size = 5

[[event_rules]]
triggers = [["Rooftop"], ["Mixer", "Social"]]
name = "Rooftop Mixer"
"#;

    #[test]
    fn parse_full() {
        let config = ImportConfig::from_toml(FULL).unwrap();
        assert_eq!(config.group_name, "Immigrant Founders Network");
        assert_eq!(config.pdf_event, "Friday Dinner");
        assert_eq!(config.sources.csv, vec![PathBuf::from("guests/a.csv"), PathBuf::from("guests/b.csv")]);
        assert_eq!(config.sources.pdf.len(), 1);
        assert_eq!(config.pdf.backend, PdfBackend::Pdftotext);
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.sample_size, 5);
        assert_eq!(config.event_table().canonicalize("Rooftop Social 2025"), "Rooftop Mixer");
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = ImportConfig::from_toml("").unwrap();
        assert_eq!(config.group_name, DEFAULT_GROUP_NAME);
        assert_eq!(config.pdf_event, DEFAULT_PDF_EVENT);
        assert_eq!(config.sources.csv.len(), DEFAULT_CSV_SOURCES.len());
        assert_eq!(config.sources.pdf.len(), DEFAULT_PDF_SOURCES.len());
        assert_eq!(config.pdf.backend, PdfBackend::Auto);
        assert_eq!(config.output.file_prefix, DEFAULT_FILE_PREFIX);
        assert_eq!(config.output.sample_size, DEFAULT_SAMPLE_SIZE);
    }

    #[test]
    fn partial_sources_table_does_not_inherit_defaults() {
        let config = ImportConfig::from_toml("[sources]\ncsv = [\"only.csv\"]\n").unwrap();
        assert_eq!(config.sources.csv.len(), 1);
        assert!(config.sources.pdf.is_empty());
    }

    #[test]
    fn reject_empty_sources() {
        let err = ImportConfig::from_toml("[sources]\n").unwrap_err();
        assert!(matches!(err, IngestError::ConfigValidation(_)));
    }

    #[test]
    fn reject_blank_group_name() {
        let err = ImportConfig::from_toml("group_name = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("group_name"));
    }

    #[test]
    fn reject_zero_sample() {
        let err = ImportConfig::from_toml("[output]\nsample_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("sample_size"));
    }

    #[test]
    fn reject_unusable_event_rule() {
        let input = "[[event_rules]]\ntriggers = [[\"\"]]\nname = \"Nope\"\n";
        let err = ImportConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("event_rules[0]"));
    }

    #[test]
    fn reject_bad_backend() {
        let err = ImportConfig::from_toml("[pdf]\nbackend = \"ocr\"\n").unwrap_err();
        assert!(matches!(err, IngestError::ConfigParse(_)));
    }
}
