//! Storage trait definitions for SpecWatch
//!
//! - `SnapshotStore`: latest scan baseline per (owner, subject), last write wins
//! - `DocumentSink`: rendered report blobs, returned as shareable references
//!
//! Both traits are async and byte-oriented; decoding snapshots is the
//! caller's job. In-memory fakes live in the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

const MAX_SEGMENT_LEN: usize = 128;

/// Validate one key component so it can double as a path segment.
fn validate_segment(value: &str) -> StorageResult<()> {
    let reason = if value.trim().is_empty() {
        Some("must not be empty")
    } else if value.len() > MAX_SEGMENT_LEN {
        Some("longer than 128 bytes")
    } else if value == "." || value == ".." {
        Some("relative path component")
    } else if value.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        Some("contains a path separator or control character")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StorageError::InvalidKey {
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// Baseline key: one snapshot per (owner, subject).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
    owner: String,
    subject: String,
}

impl SnapshotKey {
    pub fn new(owner: impl Into<String>, subject: impl Into<String>) -> StorageResult<Self> {
        let owner = owner.into();
        let subject = subject.into();
        validate_segment(&owner)?;
        validate_segment(&subject)?;
        Ok(Self { owner, subject })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.subject)
    }
}

/// Latest-baseline store.
///
/// Guarantees:
/// - `get` on an unknown key is `Ok(None)`, never `NotFound`.
/// - `put` replaces any previous value for the key.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, key: &SnapshotKey) -> StorageResult<Option<Vec<u8>>>;

    async fn put(&self, key: &SnapshotKey, bytes: &[u8]) -> StorageResult<()>;
}

// ---------------------------------------------------------------------------
// DocumentSink
// ---------------------------------------------------------------------------

/// Content digest (SHA-256 hex string) of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn from_bytes(data: &[u8]) -> Self {
        use sha2::Digest;
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentDigest(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 12 hex chars).
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of one rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    owner: String,
    subject: String,
    name: String,
}

impl DocumentKey {
    pub fn new(
        owner: impl Into<String>,
        subject: impl Into<String>,
        name: impl Into<String>,
    ) -> StorageResult<Self> {
        let key = Self {
            owner: owner.into(),
            subject: subject.into(),
            name: name.into(),
        };
        validate_segment(&key.owner)?;
        validate_segment(&key.subject)?;
        validate_segment(&key.name)?;
        Ok(key)
    }

    /// Document under the same owner and subject as a snapshot key.
    pub fn for_snapshot(key: &SnapshotKey, name: impl Into<String>) -> StorageResult<Self> {
        Self::new(key.owner.clone(), key.subject.clone(), name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.subject, self.name)
    }
}

/// What a sink hands back after storing a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub key: DocumentKey,
    /// Shareable link to the stored bytes.
    pub url: String,
    pub digest: ContentDigest,
    pub size: u64,
    pub stored_at: DateTime<Utc>,
    /// End of the link's validity, if the sink bounds it.
    pub expires_at: Option<DateTime<Utc>>,
}

impl DocumentRef {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Rendered-document sink.
///
/// Guarantees:
/// - `put` returns a reference whose digest is the SHA-256 of the bytes.
/// - `get` returns the bytes last stored under the key, or `NotFound`.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn put(&self, key: &DocumentKey, bytes: &[u8]) -> StorageResult<DocumentRef>;

    async fn get(&self, key: &DocumentKey) -> StorageResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_reject_unsafe_segments() {
        assert!(SnapshotKey::new("acme", "petstore").is_ok());
        for bad in ["", "  ", "..", "a/b", "a\\b", "tab\there"] {
            let err = SnapshotKey::new("acme", bad).unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey { .. }), "{bad:?}");
        }
        assert!(SnapshotKey::new("x".repeat(129), "s").is_err());
        assert!(DocumentKey::new("acme", "petstore", "").is_err());
    }

    #[test]
    fn digest_is_sha256_hex() {
        let d = ContentDigest::from_bytes(b"hello world");
        assert_eq!(
            d.as_str(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(d.short(), "b94d27b9934d");
    }

    #[test]
    fn short_digest_tolerates_foreign_manifests() {
        // 11 ASCII bytes then a multi-byte char straddling byte 12
        let d: ContentDigest = serde_json::from_str("\"abcdefghijkéxyz\"").unwrap();
        assert_eq!(d.short(), "abcdefghijkéxyz");
        let d: ContentDigest = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(d.short(), "abc");
    }

    #[test]
    fn expiry_is_optional() {
        let key = DocumentKey::new("a", "b", "c.pdf").unwrap();
        let now = Utc::now();
        let mut r = DocumentRef {
            key,
            url: "memory://a/b/c.pdf".to_string(),
            digest: ContentDigest::from_bytes(b""),
            size: 0,
            stored_at: now,
            expires_at: None,
        };
        assert!(!r.is_expired(now));
        r.expires_at = Some(now);
        assert!(r.is_expired(now));
    }
}
