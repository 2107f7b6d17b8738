//! Error taxonomy for the core stages.

/// Errors produced while normalizing an upstream violation list. Fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    #[error("violation list must be a sequence, found {found}")]
    NotASequence { found: &'static str },

    #[error("upstream payload has no violation list (expected `errors` or `result.errors`)")]
    MissingViolations,

    #[error("invalid upstream JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors produced while decoding or comparing against a baseline snapshot.
///
/// Callers treat these as recoverable and continue without a diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("snapshot decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors produced while laying out or encoding a document. Fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{kind} block needs {height:.1}pt but a page only has {available:.1}pt")]
    BlockTooTall {
        kind: &'static str,
        height: f32,
        available: f32,
    },

    #[error("{kind} block drew outside its reserved box ({detail})")]
    OutOfBounds { kind: &'static str, detail: String },

    #[error("document is already finalized")]
    AlreadyFinalized,

    #[error("document must be finalized before encoding")]
    NotFinalized,

    #[error("encode failed: {0}")]
    Encode(#[from] std::io::Error),
}

/// Top-level error for callers that drive several core stages.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, ScanError>;
