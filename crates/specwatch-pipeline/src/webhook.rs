//! Inbound scan events.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use specwatch_core::ScanIdentity;

use crate::error::PipelineError;

/// A request to scan one API definition.
///
/// Field names are tolerant: the subject may arrive as `subject`, `api` or
/// `name`, and the report URL as `reportUrl`, `report_url` or `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub owner: String,
    #[serde(alias = "api", alias = "name")]
    pub subject: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, alias = "report_url", alias = "url")]
    pub report_url: Option<String>,
    /// Upstream payload delivered inline with the event.
    #[serde(default)]
    pub report: Option<Value>,
    #[serde(default)]
    pub recipient: Option<String>,
}

impl ScanRequest {
    pub fn new(owner: &str, subject: &str, version: &str) -> Self {
        Self {
            owner: owner.to_string(),
            subject: subject.to_string(),
            version: version.to_string(),
            report_url: None,
            report: None,
            recipient: None,
        }
    }

    pub fn with_report(mut self, report: Value) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_report_url(mut self, url: &str) -> Self {
        self.report_url = Some(url.to_string());
        self
    }

    pub fn with_recipient(mut self, recipient: &str) -> Self {
        self.recipient = Some(recipient.to_string());
        self
    }

    pub fn identity(&self) -> ScanIdentity {
        ScanIdentity::new(self.owner.as_str(), self.subject.as_str(), self.version.as_str())
    }
}

/// Parse a webhook body. Events wrapped in a `payload` or `data` object are
/// unwrapped first.
pub fn parse_event(body: &[u8]) -> Result<ScanRequest, PipelineError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PipelineError::InvalidEvent(format!("body is not JSON: {e}")))?;
    parse_event_value(value)
}

pub fn parse_event_value(value: Value) -> Result<ScanRequest, PipelineError> {
    let inner = match value {
        Value::Object(mut map) if !map.contains_key("owner") => {
            match map.remove("payload").or_else(|| map.remove("data")) {
                Some(inner) => inner,
                None => Value::Object(map),
            }
        }
        other => other,
    };

    let mut request: ScanRequest = serde_json::from_value(inner)
        .map_err(|e| PipelineError::InvalidEvent(e.to_string()))?;

    request.owner = request.owner.trim().to_string();
    request.subject = request.subject.trim().to_string();
    request.version = request.version.trim().to_string();
    request.recipient = request.recipient.filter(|r| !r.trim().is_empty());
    request.report_url = request.report_url.filter(|u| !u.trim().is_empty());

    if request.owner.is_empty() {
        return Err(PipelineError::InvalidEvent("owner is empty".to_string()));
    }
    if request.subject.is_empty() {
        return Err(PipelineError::InvalidEvent("subject is empty".to_string()));
    }
    Ok(request)
}
