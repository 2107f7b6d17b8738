//! Fingerprint indexing with an explicit duplicate policy.

use std::collections::HashMap;

use crate::domain::{Fingerprint, Issue};

/// How two issues sharing a fingerprint within one scan are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later occurrence in iteration order replaces the earlier one.
    LastWins,
    /// The first occurrence is kept.
    FirstWins,
}

/// Policy used by the diff engine.
///
/// Duplicates collapse to a single map entry, so a scan with repeated
/// `code::path` pairs can under-count new or resolved issues.
pub const DUPLICATE_FINGERPRINT_POLICY: DuplicatePolicy = DuplicatePolicy::LastWins;

/// Index issues by fingerprint under `policy`.
pub fn index_by_fingerprint(
    issues: &[Issue],
    policy: DuplicatePolicy,
) -> HashMap<Fingerprint, &Issue> {
    let mut index = HashMap::with_capacity(issues.len());
    for issue in issues {
        match policy {
            DuplicatePolicy::LastWins => {
                index.insert(issue.fingerprint(), issue);
            }
            DuplicatePolicy::FirstWins => {
                index.entry(issue.fingerprint()).or_insert(issue);
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Location, Severity};

    fn issue(code: &str, path: &str, message: &str) -> Issue {
        Issue {
            code: code.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
            category: Category::General,
            location: Location::new(path),
        }
    }

    #[test]
    fn default_policy_is_last_wins() {
        assert_eq!(DUPLICATE_FINGERPRINT_POLICY, DuplicatePolicy::LastWins);
    }

    #[test]
    fn last_wins_keeps_later_occurrence() {
        let issues = vec![issue("a", "x", "first"), issue("a", "x", "second")];
        let index = index_by_fingerprint(&issues, DuplicatePolicy::LastWins);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&issues[0].fingerprint()].message, "second");
    }

    #[test]
    fn first_wins_keeps_earlier_occurrence() {
        let issues = vec![issue("a", "x", "first"), issue("a", "x", "second")];
        let index = index_by_fingerprint(&issues, DuplicatePolicy::FirstWins);
        assert_eq!(index[&issues[0].fingerprint()].message, "first");
    }

    #[test]
    fn distinct_fingerprints_are_all_indexed() {
        let issues = vec![issue("a", "x", ""), issue("a", "y", ""), issue("b", "x", "")];
        assert_eq!(
            index_by_fingerprint(&issues, DUPLICATE_FINGERPRINT_POLICY).len(),
            3
        );
    }
}
