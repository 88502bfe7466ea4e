//! `justiguide-core` - canonical contact record and field normalization.
//!
//! Pure types crate: no file or network IO.

pub mod contact;
pub mod normalize;
pub mod summary;

pub use contact::{Contact, SourceLabels};
pub use summary::ContactSummary;
