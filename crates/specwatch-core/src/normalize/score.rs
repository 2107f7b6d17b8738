//! Weighted-deduction quality score.

use crate::domain::Issue;

pub const MAX_SCORE: i32 = 100;

/// `100 - sum(penalty)`, clamped to `0..=100`. Independent of issue order.
pub fn quality_score(issues: &[Issue]) -> u8 {
    let deducted = issues
        .iter()
        .fold(0i32, |acc, issue| acc.saturating_add(issue.severity.penalty()));
    (MAX_SCORE - deducted).clamp(0, MAX_SCORE) as u8
}
