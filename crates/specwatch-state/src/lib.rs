//! SpecWatch State: snapshot and document storage
//!
//! Persistence collaborators for the scan pipeline. Everything here is
//! byte-oriented; the core crate owns the snapshot format.
//!
//! ## Key Components
//!
//! - `SnapshotStore`: latest baseline per (owner, subject), last write wins
//! - `DocumentSink`: rendered reports behind time-bounded links
//! - `fakes`: in-memory implementations for tests
//! - `fs`: filesystem implementations with atomic writes

mod error;
pub mod fakes;
pub mod fs;
pub mod storage_traits;

pub use error::StorageError;
pub use fs::{FsDocumentSink, FsSnapshotStore};
pub use storage_traits::{
    ContentDigest, DocumentKey, DocumentRef, DocumentSink, SnapshotKey, SnapshotStore,
    StorageResult,
};
