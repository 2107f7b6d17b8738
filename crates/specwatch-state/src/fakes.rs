//! In-memory fakes for storage traits (testing only)
//!
//! `MemorySnapshotStore` and `MemoryDocumentSink` satisfy the trait
//! contracts without touching the filesystem. Both can be switched into a
//! failing mode to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::StorageError;
use crate::storage_traits::*;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn injected_failure(what: &str) -> StorageError {
    StorageError::Io(std::io::Error::other(format!("injected {what} failure")))
}

// ---------------------------------------------------------------------------
// MemorySnapshotStore
// ---------------------------------------------------------------------------

/// In-memory snapshot store backed by a `HashMap<SnapshotKey, bytes>`.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<HashMap<SnapshotKey, Vec<u8>>>,
    fail: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with an I/O error.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Stored bytes for `key`, bypassing the failure switch.
    pub fn peek(&self, key: &SnapshotKey) -> Option<Vec<u8>> {
        lock(&self.snapshots).get(key).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.snapshots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, key: &SnapshotKey) -> StorageResult<Option<Vec<u8>>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected_failure("snapshot read"));
        }
        Ok(lock(&self.snapshots).get(key).cloned())
    }

    async fn put(&self, key: &SnapshotKey, bytes: &[u8]) -> StorageResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected_failure("snapshot write"));
        }
        lock(&self.snapshots).insert(key.clone(), bytes.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryDocumentSink
// ---------------------------------------------------------------------------

/// In-memory document sink returning `memory://` links.
#[derive(Debug)]
pub struct MemoryDocumentSink {
    documents: Mutex<HashMap<DocumentKey, Vec<u8>>>,
    ttl: Duration,
    fail: AtomicBool,
}

impl Default for MemoryDocumentSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::with_ttl(Duration::days(7))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            ttl,
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.documents).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentSink for MemoryDocumentSink {
    async fn put(&self, key: &DocumentKey, bytes: &[u8]) -> StorageResult<DocumentRef> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected_failure("document write"));
        }
        let stored_at = Utc::now();
        lock(&self.documents).insert(key.clone(), bytes.to_vec());
        Ok(DocumentRef {
            key: key.clone(),
            url: format!("memory://{key}"),
            digest: ContentDigest::from_bytes(bytes),
            size: bytes.len() as u64,
            stored_at,
            expires_at: stored_at.checked_add_signed(self.ttl),
        })
    }

    async fn get(&self, key: &DocumentKey) -> StorageResult<Vec<u8>> {
        lock(&self.documents)
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }
}
