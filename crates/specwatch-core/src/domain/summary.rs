//! Aggregate counts and score derived from an issue list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::issue::{Category, Issue, Severity};
use crate::normalize::score::quality_score;

/// Per-category tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub errors: u32,
    #[serde(default)]
    pub warnings: u32,
}

impl CategoryStats {
    /// Issues that are neither errors nor warnings.
    pub fn other(&self) -> u32 {
        self.count.saturating_sub(self.errors + self.warnings)
    }
}

/// Scan summary.
///
/// Every field defaults to zero when absent so that baselines written by
/// older releases still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_issues: u32,
    #[serde(default)]
    pub errors: u32,
    #[serde(default)]
    pub warnings: u32,
    #[serde(default)]
    pub infos: u32,
    #[serde(default)]
    pub hints: u32,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub categories: BTreeMap<Category, CategoryStats>,
    #[serde(default)]
    pub score: u8,
}

impl Summary {
    /// Build a summary from a normalized issue list.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Summary {
            total_issues: issues.len() as u32,
            ..Summary::default()
        };

        for issue in issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Information => summary.infos += 1,
                Severity::Hint => summary.hints += 1,
            }

            let stats = summary.categories.entry(issue.category).or_default();
            stats.count += 1;
            match issue.severity {
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
                _ => {}
            }
        }

        summary.passed = summary.errors == 0;
        summary.score = quality_score(issues);
        summary
    }

    /// Count for a single severity.
    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Information => self.infos,
            Severity::Hint => self.hints,
        }
    }

    /// Categories ordered by issue count (descending), ties broken by
    /// category priority.
    pub fn categories_by_count(&self) -> Vec<(Category, CategoryStats)> {
        let mut ranked: Vec<(Category, CategoryStats)> =
            self.categories.iter().map(|(c, s)| (*c, *s)).collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.0.cmp(&b.0)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::Location;

    fn issue(code: &str, severity: Severity, category: Category) -> Issue {
        Issue {
            code: code.to_string(),
            message: String::new(),
            severity,
            category,
            location: Location::new("x"),
        }
    }

    #[test]
    fn counts_and_categories() {
        let issues = vec![
            issue("a", Severity::Error, Category::Security),
            issue("b", Severity::Warning, Category::Security),
            issue("c", Severity::Hint, Category::Security),
            issue("d", Severity::Information, Category::Documentation),
        ];
        let summary = Summary::from_issues(&issues);

        assert_eq!(summary.total_issues, 4);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.infos, 1);
        assert_eq!(summary.hints, 1);
        assert!(!summary.passed);
        assert_eq!(summary.score, 100 - 10 - 3 - 1);

        let security = summary.categories[&Category::Security];
        assert_eq!(security.count, 3);
        assert_eq!(security.errors, 1);
        assert_eq!(security.warnings, 1);
        assert_eq!(security.other(), 1);
    }

    #[test]
    fn empty_summary_passes_with_full_score() {
        let summary = Summary::from_issues(&[]);
        assert!(summary.passed);
        assert_eq!(summary.score, 100);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn ranking_breaks_ties_by_priority() {
        let issues = vec![
            issue("a", Severity::Hint, Category::General),
            issue("b", Severity::Hint, Category::Documentation),
            issue("c", Severity::Hint, Category::Structure),
            issue("d", Severity::Hint, Category::Structure),
        ];
        let ranked: Vec<Category> = Summary::from_issues(&issues)
            .categories_by_count()
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(
            ranked,
            vec![Category::Structure, Category::Documentation, Category::General]
        );
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let summary: Summary = serde_json::from_str(r#"{"errors": 2}"#).unwrap();
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.score, 0);
        assert!(summary.categories.is_empty());
    }
}
