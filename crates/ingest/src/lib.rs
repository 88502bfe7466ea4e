//! `justiguide-ingest` - multi-source contact ingestion.
//!
//! Loads the configured CSV and PDF guest lists, merges them into one
//! email-keyed contact list, and persists a JSON snapshot. No HTTP or CLI
//! dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;

pub use config::ImportConfig;
pub use engine::{import_group, run};
pub use error::IngestError;
pub use model::{ImportReport, ImportRun, SourceOutcome, SourceReport};
