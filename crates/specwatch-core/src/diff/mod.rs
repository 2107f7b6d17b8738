//! Scan-over-scan diffing.
//!
//! Classifies issues of the current scan against the previous snapshot as
//! new, resolved or persisting, matching on [`Fingerprint`](crate::domain::Fingerprint)
//! (`code::path`). Message and position drift do not affect matching.

pub mod fingerprint;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{DiffError, Issue, ScanSnapshot, Summary};
use crate::normalize::NormalizedScan;
use fingerprint::{index_by_fingerprint, DUPLICATE_FINGERPRINT_POLICY};

/// Signed per-field change between two summaries (current − previous).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDelta {
    pub total_issues: i64,
    pub errors: i64,
    pub warnings: i64,
    pub infos: i64,
    pub hints: i64,
}

impl SummaryDelta {
    pub fn between(current: &Summary, previous: &Summary) -> Self {
        let d = |c: u32, p: u32| i64::from(c) - i64::from(p);
        Self {
            total_issues: d(current.total_issues, previous.total_issues),
            errors: d(current.errors, previous.errors),
            warnings: d(current.warnings, previous.warnings),
            infos: d(current.infos, previous.infos),
            hints: d(current.hints, previous.hints),
        }
    }
}

/// Result of comparing a scan against its baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub is_first_scan: bool,
    pub previous_score: Option<u8>,
    pub current_score: u8,
    pub score_change: i32,
    pub new_issues: Vec<Issue>,
    pub resolved_issues: Vec<Issue>,
    pub persisting_issues: Vec<Issue>,
    pub summary_delta: SummaryDelta,
}

impl DiffReport {
    fn first_scan(current: &Summary) -> Self {
        Self {
            is_first_scan: true,
            previous_score: None,
            current_score: current.score,
            score_change: 0,
            new_issues: Vec::new(),
            resolved_issues: Vec::new(),
            persisting_issues: Vec::new(),
            summary_delta: SummaryDelta::default(),
        }
    }

    /// True when nothing was added or resolved.
    pub fn is_unchanged(&self) -> bool {
        self.new_issues.is_empty() && self.resolved_issues.is_empty()
    }
}

/// Compare the current scan against an optional baseline.
pub fn compare(current: &NormalizedScan, previous: Option<&ScanSnapshot>) -> DiffReport {
    let Some(previous) = previous else {
        return DiffReport::first_scan(&current.summary);
    };

    let current_index = index_by_fingerprint(&current.issues, DUPLICATE_FINGERPRINT_POLICY);
    let previous_index = index_by_fingerprint(&previous.issues, DUPLICATE_FINGERPRINT_POLICY);

    let mut new_issues = Vec::new();
    let mut persisting_issues = Vec::new();
    for issue in &current.issues {
        if previous_index.contains_key(&issue.fingerprint()) {
            persisting_issues.push(issue.clone());
        } else {
            new_issues.push(issue.clone());
        }
    }

    let resolved_issues: Vec<Issue> = previous
        .issues
        .iter()
        .filter(|issue| !current_index.contains_key(&issue.fingerprint()))
        .cloned()
        .collect();

    let previous_score = previous.summary.score;
    DiffReport {
        is_first_scan: false,
        previous_score: Some(previous_score),
        current_score: current.summary.score,
        score_change: i32::from(current.summary.score) - i32::from(previous_score),
        new_issues,
        resolved_issues,
        persisting_issues,
        summary_delta: SummaryDelta::between(&current.summary, &previous.summary),
    }
}

/// Compare against an undecoded baseline, surfacing malformed snapshots as [`DiffError`].
pub fn compare_value(
    current: &NormalizedScan,
    previous: Option<&Value>,
) -> Result<DiffReport, DiffError> {
    let previous = previous.map(ScanSnapshot::from_value).transpose()?;
    Ok(compare(current, previous.as_ref()))
}
