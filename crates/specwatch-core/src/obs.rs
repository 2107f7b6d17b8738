//! Structured lifecycle events for a scan.
//!
//! - [`ScanSpan`] tags everything logged during a scan with its identity.
//! - `emit_*` functions log one event per pipeline stage.
//!
//! Every event carries an `event` field such as `scan.started`, so JSON
//! output can be filtered by stage.

use tracing::{info, warn};

use crate::domain::ScanIdentity;

/// RAII guard for a scan-scoped span.
///
/// ```ignore
/// let _span = ScanSpan::enter(&identity);
/// // events logged here carry owner, subject and version
/// ```
pub struct ScanSpan {
    _span: tracing::span::EnteredSpan,
}

impl ScanSpan {
    pub fn enter(identity: &ScanIdentity) -> Self {
        Self {
            _span: scan_span(identity).entered(),
        }
    }
}

/// The `specwatch.scan` span, for instrumenting async work with
/// `tracing::Instrument` where an entered guard cannot be held across awaits.
pub fn scan_span(identity: &ScanIdentity) -> tracing::Span {
    tracing::info_span!(
        "specwatch.scan",
        owner = %identity.owner,
        subject = %identity.subject,
        version = %identity.version,
    )
}

pub fn emit_scan_started(identity: &ScanIdentity) {
    info!(event = "scan.started", scan = %identity);
}

/// Normalization finished with the resulting counts and score.
pub fn emit_scan_normalized(total: u32, errors: u32, warnings: u32, score: u8) {
    info!(
        event = "scan.normalized",
        total_issues = total,
        errors = errors,
        warnings = warnings,
        score = score,
    );
}

pub fn emit_diff_computed(first_scan: bool, new_issues: usize, resolved_issues: usize, score_change: i32) {
    info!(
        event = "scan.diff_computed",
        first_scan = first_scan,
        new_issues = new_issues,
        resolved_issues = resolved_issues,
        score_change = score_change,
    );
}

pub fn emit_render_finished(pages: usize, bytes: usize, duration_ms: u64) {
    info!(
        event = "scan.rendered",
        pages = pages,
        bytes = bytes,
        duration_ms = duration_ms,
    );
}

pub fn emit_scan_finished(identity: &ScanIdentity, duration_ms: u64, success: bool) {
    info!(
        event = "scan.finished",
        scan = %identity,
        duration_ms = duration_ms,
        success = success,
    );
}

/// Snapshot load/save failed; the scan carries on (warning level).
pub fn emit_snapshot_error(operation: &str, error: &dyn std::fmt::Display) {
    warn!(event = "scan.snapshot_error", operation = %operation, error = %error);
}
