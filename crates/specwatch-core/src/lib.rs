//! SpecWatch Core Library
//!
//! Pure building blocks of a scan: normalize raw linter output into
//! [`Issue`]s, compare against the previous [`ScanSnapshot`], and compose a
//! paginated report. No I/O happens in this crate.

pub mod diff;
pub mod domain;
pub mod metrics;
pub mod normalize;
pub mod obs;
pub mod render;
pub mod telemetry;

pub use diff::fingerprint::{index_by_fingerprint, DuplicatePolicy, DUPLICATE_FINGERPRINT_POLICY};
pub use diff::{compare, compare_value, DiffReport, SummaryDelta};

pub use domain::{
    Category, CategoryStats, DiffError, Fingerprint, Issue, Location, NormalizationError,
    RenderError, Result, ScanError, ScanIdentity, ScanSnapshot, Severity, Summary,
};

pub use normalize::category::categorize;
pub use normalize::score::quality_score;
pub use normalize::severity::parse_severity;
pub use normalize::{normalize, normalize_str, NormalizedScan};

pub use render::{encode_pdf, render, render_pdf, Document, RenderConfig, ReportPayload};

pub use metrics::METRICS;
pub use obs::{
    emit_diff_computed, emit_render_finished, emit_scan_finished, emit_scan_normalized,
    emit_scan_started, emit_snapshot_error, scan_span, ScanSpan,
};
pub use telemetry::init_tracing;

/// Crate version, shared by every workspace member.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
