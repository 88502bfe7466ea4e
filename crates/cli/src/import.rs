//! `jg-contacts import` / `jg-contacts validate`

use std::path::{Path, PathBuf};

use justiguide_config::Settings;
use justiguide_ingest::model::{ImportReport, ImportRun, SourceStatus};
use justiguide_ingest::{import_group, ImportConfig};

use crate::exit_codes::{
    ingest_exit_code, EXIT_FORMAT, EXIT_IMPORT_INVALID_CONFIG, EXIT_IO, EXIT_USAGE,
};
use crate::CliError;

fn import_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// `--config` wins; otherwise `import.config` from settings (or its env override).
pub fn config_path(flag: Option<PathBuf>, settings: &Settings) -> Option<PathBuf> {
    flag.or_else(|| settings.import_config.clone())
}

/// Load the import config and the directory its relative paths resolve against.
///
/// With a config file, that is the file's directory; without one, the
/// built-in source list resolves against the working directory.
pub fn load_config(config_path: Option<&Path>) -> Result<(ImportConfig, PathBuf), CliError> {
    let Some(path) = config_path else {
        return Ok((ImportConfig::default(), PathBuf::from(".")));
    };

    if !path.exists() {
        return Err(import_err(EXIT_USAGE, format!("config not found: {}", path.display())));
    }

    let config = ImportConfig::from_path(path)
        .map_err(|e| import_err(ingest_exit_code(&e), e.to_string()))?;

    let base_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((config, base_dir))
}

pub fn cmd_import(
    settings: &Settings,
    config_flag: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let (config, base_dir) = load_config(config_path(config_flag, settings).as_deref())?;

    let (run, report) = import_group(&config, &base_dir)
        .map_err(|e| import_err(ingest_exit_code(&e), e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| import_err(EXIT_FORMAT, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| import_err(EXIT_IO, format!("cannot write output: {e}")))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json_output {
        println!("{json_str}");
    }

    if !quiet {
        print_summary(&run, &report);
    }

    Ok(())
}

/// Human summary to stderr
fn print_summary(run: &ImportRun, report: &ImportReport) {
    for source in &run.sources {
        match source.status {
            SourceStatus::Loaded => eprintln!(
                "  {} {}: {} contacts ({})",
                source.kind, source.path, source.contacts, source.event
            ),
            SourceStatus::Skipped | SourceStatus::Failed => eprintln!(
                "  {} {}: {} ({})",
                source.kind,
                source.path,
                source.status,
                source.reason.as_deref().unwrap_or("no reason given"),
            ),
        }
    }

    let s = &report.summary;
    eprintln!(
        "{}: {} contacts, {} with company, {} with LinkedIn, {} with phone",
        report.group_name, report.total_contacts, s.with_company, s.with_linkedin, s.with_phone,
    );

    match (&report.saved_to, &report.warning) {
        (Some(path), _) => eprintln!("saved {path}"),
        (None, Some(warning)) => eprintln!(
            "warning: {warning}: {}",
            report.error.as_deref().unwrap_or("unknown error")
        ),
        (None, None) => {}
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = load_config(Some(&config_path)).map_err(|e| {
        if e.code == EXIT_IMPORT_INVALID_CONFIG {
            e.with_hint("see [sources], [output] and [[event_rules]] in the config reference")
        } else {
            e
        }
    })?;

    eprintln!(
        "{}: valid ({} csv, {} pdf sources, {} event rules)",
        config_path.display(),
        config.sources.csv.len(),
        config.sources.pdf.len(),
        config.event_rules.len(),
    );
    Ok(())
}
