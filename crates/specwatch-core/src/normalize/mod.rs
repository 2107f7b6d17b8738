//! Issue normalization.
//!
//! Converts a provider-specific violation list into canonical [`Issue`]
//! records plus a [`Summary`]:
//! - field-tolerant record extraction (`raw` submodule)
//! - severity mapping (`severity` submodule)
//! - rule-table categorization (`category` submodule)
//! - weighted-deduction scoring (`score` submodule)

pub mod category;
pub mod raw;
pub mod score;
pub mod severity;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Issue, NormalizationError, Summary};
use category::categorize;
use raw::RawViolation;
use severity::severity_from_value;

/// Canonical output of a normalization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedScan {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

/// Normalize a raw violation list.
///
/// Every element yields exactly one issue; malformed records are kept with
/// defaulted fields. Issues come back stably sorted by severity (errors first).
pub fn normalize(raw: &Value) -> Result<NormalizedScan, NormalizationError> {
    let records = raw.as_array().ok_or(NormalizationError::NotASequence {
        found: json_kind(raw),
    })?;

    let mut issues: Vec<Issue> = records.iter().map(normalize_record).collect();
    issues.sort_by_key(|i| i.severity.ordinal());

    let summary = Summary::from_issues(&issues);
    tracing::debug!(
        total = summary.total_issues,
        errors = summary.errors,
        score = summary.score,
        "normalized violation list"
    );

    Ok(NormalizedScan { issues, summary })
}

/// Parse JSON text and normalize it.
pub fn normalize_str(raw: &str) -> Result<NormalizedScan, NormalizationError> {
    let value: Value = serde_json::from_str(raw)?;
    normalize(&value)
}

fn normalize_record(value: &Value) -> Issue {
    let raw = RawViolation::new(value);
    let code = raw.rule();
    Issue {
        category: categorize(&code),
        severity: severity_from_value(raw.severity()),
        message: raw.message(),
        location: raw.location(),
        code,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
