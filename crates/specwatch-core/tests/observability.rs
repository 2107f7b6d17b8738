//! Observability tests for scan lifecycle tracing.

use specwatch_core::metrics::Metrics;
use specwatch_core::{
    emit_diff_computed, emit_render_finished, emit_scan_finished, emit_scan_normalized,
    emit_scan_started, emit_snapshot_error, ScanIdentity, ScanSpan,
};
use tracing_test::traced_test;

fn identity() -> ScanIdentity {
    ScanIdentity::new("acme", "petstore", "1.4.2")
}

#[traced_test]
#[test]
fn scan_started_logs_identity() {
    emit_scan_started(&identity());
    assert!(logs_contain("scan.started"));
    assert!(logs_contain("acme/petstore v1.4.2"));
}

#[traced_test]
#[test]
fn normalized_logs_counts_and_score() {
    emit_scan_normalized(12, 2, 7, 59);
    assert!(logs_contain("scan.normalized"));
    assert!(logs_contain("score=59"));
}

#[traced_test]
#[test]
fn diff_and_render_events() {
    emit_diff_computed(false, 3, 1, -7);
    emit_render_finished(6, 48_213, 12);
    assert!(logs_contain("scan.diff_computed"));
    assert!(logs_contain("score_change=-7"));
    assert!(logs_contain("scan.rendered"));
    assert!(logs_contain("pages=6"));
}

#[traced_test]
#[test]
fn snapshot_error_is_a_warning() {
    let error = "disk full";
    emit_snapshot_error("save", &error);
    assert!(logs_contain("WARN"));
    assert!(logs_contain("scan.snapshot_error"));
    assert!(logs_contain("disk full"));
}

#[traced_test]
#[test]
fn events_inside_scan_span_carry_subject() {
    let identity = identity();
    {
        let _span = ScanSpan::enter(&identity);
        emit_scan_finished(&identity, 850, true);
    }
    assert!(logs_contain("specwatch.scan"));
    assert!(logs_contain("scan.finished"));
    assert!(logs_contain("success=true"));
}

#[traced_test]
#[test]
fn metrics_flush_reports_counters() {
    let metrics = Metrics::new();
    metrics.inc_scans_completed();
    metrics.add_pages_rendered(5);
    metrics.flush();
    assert!(logs_contain("scans_completed=1"));
    assert!(logs_contain("pages_rendered=5"));
}
