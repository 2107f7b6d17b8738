//! Trait contract tests for SnapshotStore and DocumentSink.
//!
//! Every backend runs the same contract checks: the in-memory fakes and
//! the filesystem implementations.

use std::time::Duration;

use specwatch_state::fakes::{MemoryDocumentSink, MemorySnapshotStore};
use specwatch_state::storage_traits::*;
use specwatch_state::{FsDocumentSink, FsSnapshotStore, StorageError};

fn key() -> SnapshotKey {
    SnapshotKey::new("acme", "petstore").unwrap()
}

// ===========================================================================
// SnapshotStore contract
// ===========================================================================

async fn snapshot_contract(store: &dyn SnapshotStore) {
    // absent key is not an error
    assert_eq!(store.get(&key()).await.unwrap(), None);

    store.put(&key(), b"{\"v\":1}").await.unwrap();
    assert_eq!(store.get(&key()).await.unwrap().as_deref(), Some(&b"{\"v\":1}"[..]));

    // last write wins
    store.put(&key(), b"{\"v\":2}").await.unwrap();
    assert_eq!(store.get(&key()).await.unwrap().as_deref(), Some(&b"{\"v\":2}"[..]));

    // keys are independent
    let other = SnapshotKey::new("acme", "billing").unwrap();
    assert_eq!(store.get(&other).await.unwrap(), None);
    let other_owner = SnapshotKey::new("globex", "petstore").unwrap();
    assert_eq!(store.get(&other_owner).await.unwrap(), None);

    // empty payloads are stored, not treated as absent
    store.put(&other, b"").await.unwrap();
    assert_eq!(store.get(&other).await.unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn memory_snapshot_store_contract() {
    snapshot_contract(&MemorySnapshotStore::new()).await;
}

#[tokio::test]
async fn fs_snapshot_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    snapshot_contract(&FsSnapshotStore::new(dir.path()).unwrap()).await;
}

#[tokio::test]
async fn fs_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    FsSnapshotStore::new(dir.path())
        .unwrap()
        .put(&key(), b"persisted")
        .await
        .unwrap();
    let reopened = FsSnapshotStore::new(dir.path()).unwrap();
    assert_eq!(reopened.get(&key()).await.unwrap().as_deref(), Some(&b"persisted"[..]));
}

#[tokio::test]
async fn failing_memory_store_reports_io_errors() {
    let store = MemorySnapshotStore::new();
    store.put(&key(), b"x").await.unwrap();
    store.set_failing(true);
    assert!(matches!(store.get(&key()).await, Err(StorageError::Io(_))));
    assert!(matches!(store.put(&key(), b"y").await, Err(StorageError::Io(_))));
    assert_eq!(store.peek(&key()).as_deref(), Some(&b"x"[..]));
}

// ===========================================================================
// DocumentSink contract
// ===========================================================================

async fn sink_contract(sink: &dyn DocumentSink) {
    let doc = DocumentKey::for_snapshot(&key(), "report-1.pdf").unwrap();
    let missing = DocumentKey::for_snapshot(&key(), "missing.pdf").unwrap();

    let err = sink.get(&missing).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    let bytes = b"%PDF-1.4 fake body";
    let doc_ref = sink.put(&doc, bytes).await.unwrap();
    assert_eq!(doc_ref.key, doc);
    assert_eq!(doc_ref.digest, ContentDigest::from_bytes(bytes));
    assert_eq!(doc_ref.size, bytes.len() as u64);
    assert!(doc_ref.url.contains("report-1.pdf"));
    assert!(!doc_ref.is_expired(doc_ref.stored_at));

    assert_eq!(sink.get(&doc).await.unwrap(), bytes);
}

#[tokio::test]
async fn memory_sink_contract() {
    sink_contract(&MemoryDocumentSink::new()).await;
}

#[tokio::test]
async fn fs_sink_contract() {
    let dir = tempfile::tempdir().unwrap();
    sink_contract(&FsDocumentSink::new(dir.path(), Duration::from_secs(600)).unwrap()).await;
}

#[tokio::test]
async fn memory_sink_links_expire_after_ttl() {
    let sink = MemoryDocumentSink::with_ttl(chrono::Duration::minutes(5));
    let doc = DocumentKey::for_snapshot(&key(), "r.pdf").unwrap();
    let doc_ref = sink.put(&doc, b"x").await.unwrap();
    assert!(doc_ref.url.starts_with("memory://acme/petstore/"));
    assert!(doc_ref.is_expired(doc_ref.stored_at + chrono::Duration::minutes(5)));
    assert!(!doc_ref.is_expired(doc_ref.stored_at + chrono::Duration::minutes(4)));
}

#[tokio::test]
async fn failing_sink_rejects_put() {
    let sink = MemoryDocumentSink::new();
    sink.set_failing(true);
    let doc = DocumentKey::for_snapshot(&key(), "r.pdf").unwrap();
    assert!(matches!(sink.put(&doc, b"x").await, Err(StorageError::Io(_))));
    assert!(sink.is_empty());
}
