//! Pipeline configuration from environment variables.
//!
//! | variable | default |
//! |----------|---------|
//! | `SPECWATCH_UPSTREAM_URL` | unset; events must carry the report or its URL |
//! | `SPECWATCH_UPSTREAM_TOKEN` | unset |
//! | `SPECWATCH_DATA_DIR` | `./specwatch-data` |
//! | `SPECWATCH_LINK_TTL_SECS` | `604800` (7 days) |
//! | `SPECWATCH_RECIPIENT` | unset; no notification unless the event names one |
//! | `SPECWATCH_HTTP_TIMEOUT_SECS` | `30` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use specwatch_core::RenderConfig;

use crate::error::PipelineError;

pub const ENV_UPSTREAM_URL: &str = "SPECWATCH_UPSTREAM_URL";
pub const ENV_UPSTREAM_TOKEN: &str = "SPECWATCH_UPSTREAM_TOKEN";
pub const ENV_DATA_DIR: &str = "SPECWATCH_DATA_DIR";
pub const ENV_LINK_TTL_SECS: &str = "SPECWATCH_LINK_TTL_SECS";
pub const ENV_RECIPIENT: &str = "SPECWATCH_RECIPIENT";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SPECWATCH_HTTP_TIMEOUT_SECS";

const DEFAULT_DATA_DIR: &str = "./specwatch-data";
const DEFAULT_LINK_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL for fetching reports by identity: `<base>/<owner>/<subject>/<version>`.
    pub upstream_url: Option<String>,
    /// Bearer token sent to the upstream service.
    pub upstream_token: Option<String>,
    /// Root for the filesystem snapshot store and document sink.
    pub data_dir: PathBuf,
    /// How long document links stay valid.
    pub link_ttl: Duration,
    /// Fallback notification recipient.
    pub recipient: Option<String>,
    pub http_timeout: Duration,
    pub render: RenderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upstream_url: None,
            upstream_token: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            link_ttl: DEFAULT_LINK_TTL,
            recipient: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            render: RenderConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: Duration| -> Result<Duration, PipelineError> {
            match get(key) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| PipelineError::Config(format!("{key}={raw:?}: {e}"))),
            }
        };

        Ok(Self {
            upstream_url: get(ENV_UPSTREAM_URL).map(|u| u.trim_end_matches('/').to_string()),
            upstream_token: get(ENV_UPSTREAM_TOKEN),
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            link_ttl: secs(ENV_LINK_TTL_SECS, DEFAULT_LINK_TTL)?,
            recipient: get(ENV_RECIPIENT),
            http_timeout: secs(ENV_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT)?,
            render: RenderConfig::default(),
        })
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_upstream_url(mut self, url: &str) -> Self {
        self.upstream_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_recipient(mut self, recipient: &str) -> Self {
        self.recipient = Some(recipient.to_string());
        self
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

/// Parse a TOML compositor configuration. Missing fields take defaults.
pub fn parse_render_config(text: &str) -> Result<RenderConfig, PipelineError> {
    toml::from_str(text).map_err(|e| PipelineError::Config(format!("render config: {e}")))
}

pub fn load_render_config(path: &Path) -> Result<RenderConfig, PipelineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
    parse_render_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = PipelineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.upstream_url, None);
        assert_eq!(cfg.data_dir, PathBuf::from("./specwatch-data"));
        assert_eq!(cfg.link_ttl, Duration::from_secs(604_800));
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert_eq!(cfg.recipient, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = PipelineConfig::from_lookup(lookup(&[
            (ENV_UPSTREAM_URL, "https://lint.example.com/api/"),
            (ENV_UPSTREAM_TOKEN, "secret"),
            (ENV_DATA_DIR, "/var/lib/specwatch"),
            (ENV_LINK_TTL_SECS, "3600"),
            (ENV_RECIPIENT, "  "),
            (ENV_HTTP_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.upstream_url.as_deref(), Some("https://lint.example.com/api"));
        assert_eq!(cfg.upstream_token.as_deref(), Some("secret"));
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/specwatch"));
        assert_eq!(cfg.link_ttl, Duration::from_secs(3600));
        assert_eq!(cfg.recipient, None);
        assert_eq!(cfg.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_number_is_a_config_error() {
        let err = PipelineConfig::from_lookup(lookup(&[(ENV_LINK_TTL_SECS, "a week")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(msg) if msg.contains(ENV_LINK_TTL_SECS)));
    }

    #[test]
    fn render_config_from_toml() {
        let cfg = parse_render_config(
            r##"
            brand = "Acme API Guild"
            diff_preview_limit = 5
            show_recommendations = false

            [theme]
            primary = "#112233"
            "##,
        )
        .unwrap();
        assert_eq!(cfg.brand, "Acme API Guild");
        assert_eq!(cfg.diff_preview_limit, 5);
        assert!(!cfg.show_recommendations);
        assert_eq!(cfg.theme.primary.to_hex(), "#112233");
        assert_eq!(cfg.category_sample_limit, 5);

        assert!(parse_render_config("diff_preview_limit = \"many\"").is_err());
    }
}
