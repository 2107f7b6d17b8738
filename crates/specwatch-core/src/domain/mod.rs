//! Domain models for SpecWatch.
//!
//! Canonical definitions for the core entities:
//! - `Issue`: One normalized lint violation
//! - `Summary`: Counts, category tallies and quality score for a scan
//! - `ScanSnapshot`: Persisted baseline for the next comparison

pub mod error;
pub mod issue;
pub mod snapshot;
pub mod summary;

// Re-export main types and errors
pub use error::{DiffError, NormalizationError, RenderError, Result, ScanError};
pub use issue::{Category, Fingerprint, Issue, Location, Severity};
pub use snapshot::{ScanIdentity, ScanSnapshot};
pub use summary::{CategoryStats, Summary};
