//! Pipeline error taxonomy and the user-visible failure payload.

use serde::Serialize;
use serde_json::{json, Value};
use specwatch_core::{NormalizationError, RenderError};
use specwatch_state::StorageError;
use thiserror::Error;

use crate::notify::TransportError;

/// Failures while obtaining the upstream report.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("upstream body from {url} is not JSON: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no report source: event has no inline report or URL and no upstream base URL is configured")]
    NoSource,
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Event,
    Config,
    Fetch,
    Normalize,
    Render,
    Store,
    Notify,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Config => "config",
            Self::Fetch => "fetch",
            Self::Normalize => "normalize",
            Self::Render => "render",
            Self::Store => "store",
            Self::Notify => "notify",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal pipeline failures. Snapshot problems never appear here; they are
/// logged and the scan continues without a baseline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("normalization failed: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("storing the report failed: {0}")]
    Sink(#[source] StorageError),

    #[error("notification failed: {0}")]
    Transport(#[from] TransportError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidEvent(_) => Stage::Event,
            Self::Config(_) => Stage::Config,
            Self::Upstream(_) => Stage::Fetch,
            Self::Normalization(_) => Stage::Normalize,
            Self::Render(_) => Stage::Render,
            Self::Sink(_) => Stage::Store,
            Self::Transport(_) => Stage::Notify,
        }
    }

    /// Structured failure reported back to the caller. Never contains a
    /// partial document.
    pub fn failure_payload(&self) -> Value {
        json!({
            "status": "failed",
            "stage": self.stage(),
            "error": self.to_string(),
        })
    }
}
