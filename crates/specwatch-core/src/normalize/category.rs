//! Keyword classifier mapping rule identifiers to categories.
//!
//! Rules are evaluated top-down against the lower-cased rule identifier;
//! the first rule with a matching keyword wins.

use crate::domain::Category;

/// One classification rule: a category and the substrings that select it.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, folded: &str) -> bool {
        self.keywords.iter().any(|k| folded.contains(k))
    }
}

/// Ordered rule table. `General` is the fallback and has no rule.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::SpecCompliance,
        keywords: &["oas2", "oas3", "openapi", "swagger", "schema", "valid", "spec"],
    },
    CategoryRule {
        category: Category::Documentation,
        keywords: &[
            "description",
            "summary",
            "info-",
            "contact",
            "license",
            "docs",
            "example",
        ],
    },
    CategoryRule {
        category: Category::Structure,
        keywords: &[
            "paths",
            "path-",
            "operation",
            "parameter",
            "tag",
            "unused",
            "duplicate",
            "$ref",
            "ref-",
        ],
    },
    CategoryRule {
        category: Category::Security,
        keywords: &["security", "auth", "oauth", "api-key", "apikey", "credential", "https"],
    },
    CategoryRule {
        category: Category::NamingConventions,
        keywords: &["casing", "naming", "kebab", "camel", "snake", "pascal"],
    },
    CategoryRule {
        category: Category::ResponseDesign,
        keywords: &["response", "status", "media-type", "content-type", "error-"],
    },
    CategoryRule {
        category: Category::ServerConfiguration,
        keywords: &["server", "host", "base-path", "basepath", "url"],
    },
    CategoryRule {
        category: Category::BestPractice,
        keywords: &["no-", "avoid", "deprecat", "recommend", "prefer"],
    },
];

/// Classify a rule identifier.
pub fn categorize(rule: &str) -> Category {
    let folded = rule.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|r| r.matches(&folded))
        .map(|r| r.category)
        .unwrap_or(Category::General)
}
