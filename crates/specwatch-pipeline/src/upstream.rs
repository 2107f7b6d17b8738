//! Upstream lint report retrieval.

use async_trait::async_trait;
use serde_json::Value;
use specwatch_core::{NormalizationError, ScanIdentity};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::UpstreamError;

/// Source of raw upstream lint payloads.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, UpstreamError>;
}

/// HTTP client for the upstream lint service.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("specwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            base_url: config.upstream_url.clone(),
            token: config.upstream_token.clone(),
        })
    }

    /// Report URL derived from the configured base URL, if any.
    pub fn report_url(&self, identity: &ScanIdentity) -> Option<String> {
        report_url(self.base_url.as_deref()?, identity)
    }
}

/// `<base>/<owner>/<subject>/<version>`, or without the version segment when
/// the version is blank.
pub fn report_url(base: &str, identity: &ScanIdentity) -> Option<String> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    let mut url = format!("{base}/{}/{}", identity.owner, identity.subject);
    if !identity.version.trim().is_empty() {
        url.push('/');
        url.push_str(&identity.version);
    }
    Some(url)
}

#[async_trait]
impl ReportFetcher for UpstreamClient {
    async fn fetch(&self, url: &str) -> Result<Value, UpstreamError> {
        info!(url = %url, "Fetching upstream report");

        let mut request = self.http.get(url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| UpstreamError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|source| UpstreamError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(url = %url, "Upstream report received");
        Ok(body)
    }
}

/// Locate the violation list inside an upstream payload.
///
/// Accepts `{"errors": [...]}`, `{"result": {"errors": [...]}}` or a bare
/// array.
pub fn extract_violations(payload: &Value) -> Result<&Value, NormalizationError> {
    if payload.is_array() {
        return Ok(payload);
    }
    payload
        .get("errors")
        .or_else(|| payload.get("result").and_then(|r| r.get("errors")))
        .ok_or(NormalizationError::MissingViolations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_from_all_envelope_shapes() {
        let list = json!([{"code": "a"}]);
        assert_eq!(extract_violations(&list).unwrap(), &list);

        let top = json!({"errors": [{"code": "a"}], "valid": false});
        assert_eq!(extract_violations(&top).unwrap(), &list);

        let nested = json!({"result": {"errors": [{"code": "a"}]}});
        assert_eq!(extract_violations(&nested).unwrap(), &list);
    }

    #[test]
    fn missing_list_is_an_error() {
        let err = extract_violations(&json!({"result": {}})).unwrap_err();
        assert!(matches!(err, NormalizationError::MissingViolations));
    }

    #[test]
    fn non_array_errors_field_is_passed_through() {
        // normalization rejects it with a clearer message
        let payload = json!({"errors": "boom"});
        assert_eq!(extract_violations(&payload).unwrap(), &json!("boom"));
    }

    #[test]
    fn report_url_from_base() {
        let id = ScanIdentity::new("acme", "petstore", "1.2.0");
        assert_eq!(
            report_url("https://lint.example.com/v1/", &id).as_deref(),
            Some("https://lint.example.com/v1/acme/petstore/1.2.0")
        );
        let unversioned = ScanIdentity::new("acme", "petstore", "");
        assert_eq!(
            report_url("https://lint.example.com", &unversioned).as_deref(),
            Some("https://lint.example.com/acme/petstore")
        );
        assert_eq!(report_url("", &id), None);
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = UpstreamClient::new(&PipelineConfig::default()).unwrap();
        let id = ScanIdentity::new("acme", "petstore", "1");
        assert_eq!(client.report_url(&id), None);
    }
}
