//! Filesystem-backed snapshot store and document sink.
//!
//! Layout under the data root:
//!
//! ```text
//! snapshots/<owner>/<subject>.json
//! documents/<owner>/<subject>/<name>
//! documents/<owner>/<subject>/<name>.ref.json
//! ```
//!
//! Writes go to a temp file in the target directory and are renamed into
//! place, so readers never observe a half-written file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tempfile::NamedTempFile;

use crate::error::StorageError;
use crate::storage_traits::*;

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::other(format!("{} has no parent", path.display())))?;
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(e)))?
}

// ---------------------------------------------------------------------------
// FsSnapshotStore
// ---------------------------------------------------------------------------

pub struct FsSnapshotStore {
    snapshots_dir: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store rooted at `root`. Creates `root/snapshots/` if needed.
    pub fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let snapshots_dir = root.as_ref().join("snapshots");
        fs::create_dir_all(&snapshots_dir)?;
        Ok(Self { snapshots_dir })
    }

    fn path(&self, key: &SnapshotKey) -> PathBuf {
        self.snapshots_dir
            .join(key.owner())
            .join(format!("{}.json", key.subject()))
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn get(&self, key: &SnapshotKey) -> StorageResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn put(&self, key: &SnapshotKey, bytes: &[u8]) -> StorageResult<()> {
        let path = self.path(key);
        let data = bytes.to_vec();
        blocking(move || Ok(write_atomic(&path, &data)?)).await?;
        tracing::debug!(key = %key, bytes = bytes.len(), "snapshot written");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FsDocumentSink
// ---------------------------------------------------------------------------

/// Stores documents on disk and hands out `file://` links valid for `ttl`.
pub struct FsDocumentSink {
    documents_dir: PathBuf,
    ttl: Duration,
}

impl FsDocumentSink {
    /// Create a sink rooted at `root`. Creates `root/documents/` if needed.
    pub fn new(root: impl AsRef<Path>, ttl: Duration) -> StorageResult<Self> {
        let dir = root.as_ref().join("documents");
        fs::create_dir_all(&dir)?;
        // Links must be absolute to be usable outside this process.
        let documents_dir = fs::canonicalize(&dir)?;
        Ok(Self { documents_dir, ttl })
    }

    fn path(&self, key: &DocumentKey) -> PathBuf {
        self.documents_dir
            .join(key.owner())
            .join(key.subject())
            .join(key.name())
    }

    fn ref_path(&self, key: &DocumentKey) -> PathBuf {
        let mut path = self.path(key).into_os_string();
        path.push(".ref.json");
        PathBuf::from(path)
    }

    /// Reference recorded by the last `put` for `key`.
    pub async fn get_ref(&self, key: &DocumentKey) -> StorageResult<DocumentRef> {
        let bytes = tokio::fs::read(self.ref_path(key)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::Io(e)
            }
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentSink for FsDocumentSink {
    async fn put(&self, key: &DocumentKey, bytes: &[u8]) -> StorageResult<DocumentRef> {
        let path = self.path(key);
        let stored_at = Utc::now();
        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| stored_at.checked_add_signed(ttl));
        let doc_ref = DocumentRef {
            key: key.clone(),
            url: format!("file://{}", path.display()),
            digest: ContentDigest::from_bytes(bytes),
            size: bytes.len() as u64,
            stored_at,
            expires_at,
        };
        let manifest = serde_json::to_vec_pretty(&doc_ref)?;

        let data = bytes.to_vec();
        let ref_path = self.ref_path(key);
        blocking(move || {
            write_atomic(&path, &data)?;
            write_atomic(&ref_path, &manifest)?;
            Ok(())
        })
        .await?;

        tracing::debug!(key = %key, digest = %doc_ref.digest.short(), "document stored");
        Ok(doc_ref)
    }

    async fn get(&self, key: &DocumentKey) -> StorageResult<Vec<u8>> {
        tokio::fs::read(self.path(key)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::Io(e)
            }
        })
    }
}
