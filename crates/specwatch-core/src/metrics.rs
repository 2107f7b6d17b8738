//! Process-wide scan counters.
//!
//! Call sites bump counters without logging anything. [`Metrics::flush`]
//! reports all values in one `tracing::info!` event, usually when a scan ends.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Atomic counters; no allocation or locking.
pub struct Metrics {
    scans_completed: AtomicU64,
    scans_failed: AtomicU64,
    issues_normalized: AtomicU64,
    pages_rendered: AtomicU64,
    snapshot_failures: AtomicU64,
    notifications_sent: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            scans_completed: AtomicU64::new(0),
            scans_failed: AtomicU64::new(0),
            issues_normalized: AtomicU64::new(0),
            pages_rendered: AtomicU64::new(0),
            snapshot_failures: AtomicU64::new(0),
            notifications_sent: AtomicU64::new(0),
        }
    }

    pub fn inc_scans_completed(&self) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "scans_completed", "counter incremented");
    }

    pub fn inc_scans_failed(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "scans_failed", "counter incremented");
    }

    /// Add the number of issues produced by one normalization.
    pub fn add_issues_normalized(&self, n: u64) {
        self.issues_normalized.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "issues_normalized", n, "counter incremented");
    }

    pub fn add_pages_rendered(&self, n: u64) {
        self.pages_rendered.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "pages_rendered", n, "counter incremented");
    }

    /// Snapshot load or save failures, which never fail a scan.
    pub fn inc_snapshot_failures(&self) {
        self.snapshot_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "snapshot_failures", "counter incremented");
    }

    pub fn inc_notifications_sent(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "notifications_sent", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            scans_completed = self.scans_completed(),
            scans_failed = self.scans_failed(),
            issues_normalized = self.issues_normalized(),
            pages_rendered = self.pages_rendered(),
            snapshot_failures = self.snapshot_failures(),
            notifications_sent = self.notifications_sent(),
        );
    }

    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::Relaxed)
    }

    pub fn scans_failed(&self) -> u64 {
        self.scans_failed.load(Ordering::Relaxed)
    }

    pub fn issues_normalized(&self) -> u64 {
        self.issues_normalized.load(Ordering::Relaxed)
    }

    pub fn pages_rendered(&self) -> u64 {
        self.pages_rendered.load(Ordering::Relaxed)
    }

    pub fn snapshot_failures(&self) -> u64 {
        self.snapshot_failures.load(Ordering::Relaxed)
    }

    pub fn notifications_sent(&self) -> u64 {
        self.notifications_sent.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        for counter in [
            &self.scans_completed,
            &self.scans_failed,
            &self.issues_normalized,
            &self.pages_rendered,
            &self.snapshot_failures,
            &self.notifications_sent,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
