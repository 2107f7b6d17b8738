//! SpecWatch Pipeline - scan orchestration
//!
//! Turns an inbound scan event into a stored PDF report:
//! - Fetches the upstream lint payload (or takes it inline)
//! - Normalizes and diffs it against the last snapshot
//! - Renders, stores and announces the report

pub mod config;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod upstream;
pub mod webhook;

// Re-export key types
pub use config::{load_render_config, parse_render_config, PipelineConfig};
pub use error::{PipelineError, Stage, UpstreamError};
pub use notify::{
    compose_notification, Attachment, LogNotifier, Notification, Notifier, RecordingNotifier,
    TransportError,
};
pub use pipeline::{ScanOutcome, ScanPipeline};
pub use upstream::{extract_violations, report_url, ReportFetcher, UpstreamClient};
pub use webhook::{parse_event, parse_event_value, ScanRequest};
