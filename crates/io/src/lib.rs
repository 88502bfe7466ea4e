// File I/O: guest-list extraction and snapshot persistence

pub mod csv;
pub mod error;
pub mod events;
pub mod pdf;
pub mod snapshot;

pub use error::{ExtractError, SnapshotError};
pub use events::{EventRule, EventTable};
pub use pdf::PdfBackend;

