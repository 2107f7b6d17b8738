//! Persisted baseline of the latest scan for one (owner, subject) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DiffError;
use super::issue::Issue;
use super::summary::Summary;

/// Identity of the scanned API definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanIdentity {
    pub owner: String,
    pub subject: String,
    pub version: String,
}

impl ScanIdentity {
    pub fn new(owner: impl Into<String>, subject: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            subject: subject.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for ScanIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} v{}", self.owner, self.subject, self.version)
    }
}

/// Durable diff baseline. A new snapshot unconditionally replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub owner: String,
    pub subject: String,
    #[serde(default)]
    pub version: String,
    pub scanned_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl ScanSnapshot {
    pub fn new(identity: &ScanIdentity, summary: Summary, issues: Vec<Issue>, scanned_at: DateTime<Utc>) -> Self {
        Self {
            owner: identity.owner.clone(),
            subject: identity.subject.clone(),
            version: identity.version.clone(),
            scanned_at,
            summary,
            issues,
        }
    }

    /// Decode a persisted snapshot, rejecting structurally invalid baselines.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DiffError> {
        let snapshot: ScanSnapshot = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Decode from an already-parsed JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DiffError> {
        let snapshot = ScanSnapshot::deserialize(value)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    fn validate(&self) -> Result<(), DiffError> {
        if let Some(idx) = self.issues.iter().position(|i| i.code.is_empty()) {
            return Err(DiffError::MalformedSnapshot(format!(
                "issue {idx} has an empty rule code"
            )));
        }
        Ok(())
    }
}
