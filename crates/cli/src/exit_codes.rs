//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; cron jobs and deploy scripts
//! branch on them.
//!
//! | Range   | Domain     | Description                                |
//! |---------|------------|--------------------------------------------|
//! | 0       | Universal  | Success                                    |
//! | 1       | Universal  | General error (unspecified)                |
//! | 2       | Universal  | CLI usage error (bad args, missing file)   |
//! | 3-4     | Universal  | Output I/O, serialization                  |
//! | 10-19   | import     | Import config and pipeline codes           |
//! | 20-29   | serve      | HTTP service codes                         |

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
/// A snapshot that could not be written still exits 0; the warning is on stderr.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Cannot write the requested output file.
pub const EXIT_IO: u8 = 3;

/// Report could not be serialized.
pub const EXIT_FORMAT: u8 = 4;

// =============================================================================
// Import (10-19)
// =============================================================================

/// Import config unreadable, unparseable, or failed validation.
pub const EXIT_IMPORT_INVALID_CONFIG: u8 = 10;

/// Pipeline aborted (a CSV source exists but could not be read or parsed).
pub const EXIT_IMPORT_RUNTIME: u8 = 11;

// =============================================================================
// Serve (20-29)
// =============================================================================

/// Cannot bind the listen address.
pub const EXIT_SERVE_BIND: u8 = 20;

/// Server stopped with an I/O error or the runtime failed to start.
pub const EXIT_SERVE_RUNTIME: u8 = 21;

use justiguide_ingest::IngestError;

/// Map an ingest error to its exit code.
pub fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::ConfigParse(_) | IngestError::ConfigValidation(_) | IngestError::Io(_) => {
            EXIT_IMPORT_INVALID_CONFIG
        }
        IngestError::Csv { .. } => EXIT_IMPORT_RUNTIME,
    }
}
