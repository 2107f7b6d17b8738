//! Recommendations derived from which categories have issues.

use serde::Serialize;
use std::fmt;

use super::blocks::{heading, BODY_SIZE, SMALL_SIZE};
use super::config::{Color, RenderConfig};
use super::document::{BlockKind, Document, Font};
use super::text::{line_height, wrap};
use crate::domain::{Category, RenderError, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub body: &'static str,
    pub priority: Priority,
}

struct Rule {
    category: Category,
    recommendation: Recommendation,
}

const fn rule(category: Category, priority: Priority, title: &'static str, body: &'static str) -> Rule {
    Rule {
        category,
        recommendation: Recommendation {
            title,
            body,
            priority,
        },
    }
}

const RULES: &[Rule] = &[
    rule(
        Category::SpecCompliance,
        Priority::High,
        "Fix specification compliance errors",
        "The definition does not fully conform to the OpenAPI specification. \
         Invalid documents break code generators and gateways, so resolve these first.",
    ),
    rule(
        Category::Security,
        Priority::High,
        "Define security schemes for every operation",
        "Declare authentication requirements explicitly and serve the API over HTTPS only. \
         Operations without a security requirement are treated as public.",
    ),
    rule(
        Category::ResponseDesign,
        Priority::Medium,
        "Document responses consistently",
        "Describe success and error responses for each operation, including media types \
         and a shared error schema, so clients can handle failures predictably.",
    ),
    rule(
        Category::Structure,
        Priority::Medium,
        "Tidy up the definition structure",
        "Remove unused components, resolve duplicate identifiers and check that every \
         reference points at an existing definition.",
    ),
    rule(
        Category::ServerConfiguration,
        Priority::Medium,
        "Review server configuration",
        "List valid server URLs for each environment and avoid hard-coded hosts or \
         trailing slashes in base paths.",
    ),
    rule(
        Category::Documentation,
        Priority::Low,
        "Improve API documentation",
        "Add summaries and descriptions to operations, parameters and schemas, together \
         with contact and license information in the info object.",
    ),
    rule(
        Category::NamingConventions,
        Priority::Low,
        "Adopt consistent naming conventions",
        "Pick one casing style for paths, parameters and properties and apply it across \
         the whole definition.",
    ),
    rule(
        Category::BestPractice,
        Priority::Low,
        "Follow API design best practices",
        "Replace deprecated constructs and apply the linter's recommended patterns to keep \
         the definition maintainable.",
    ),
];

const MAINTAIN: Recommendation = Recommendation {
    title: "Maintain current quality",
    body: "No category triggered a specific recommendation. Keep linting on every change \
           to catch regressions early.",
    priority: Priority::Low,
};

/// Recommendations for the categories present in `summary`, highest
/// priority first. Falls back to a single "maintain quality" entry.
pub fn recommendations(summary: &Summary) -> Vec<Recommendation> {
    let mut picked: Vec<Recommendation> = RULES
        .iter()
        .filter(|r| {
            summary
                .categories
                .get(&r.category)
                .is_some_and(|stats| stats.count > 0)
        })
        .map(|r| r.recommendation.clone())
        .collect();
    if picked.is_empty() {
        picked.push(MAINTAIN);
    }
    picked.sort_by_key(|r| r.priority);
    picked
}

pub fn draw(doc: &mut Document, summary: &Summary, config: &RenderConfig) -> Result<(), RenderError> {
    heading(doc, config, "Recommendations")?;
    for rec in recommendations(summary) {
        entry(doc, &rec, config)?;
    }
    Ok(())
}

fn priority_color(config: &RenderConfig, priority: Priority) -> Color {
    match priority {
        Priority::High => config.theme.error,
        Priority::Medium => config.theme.warning,
        Priority::Low => config.theme.info,
    }
}

fn entry(doc: &mut Document, rec: &Recommendation, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    let accent = priority_color(config, rec.priority);
    let lead = line_height(BODY_SIZE);
    let body = wrap(rec.body, BODY_SIZE, doc.geometry().content_width() - 14.0);
    let badge = format!("{} priority", rec.priority);
    let height = 24.0 + body.len() as f32 * lead + 12.0;

    doc.place(BlockKind::Recommendation, height, |c| {
        let w = c.width();
        c.rect(0.0, 0.0, w, height - 6.0, theme.panel)?;
        c.rect(0.0, 0.0, 4.0, height - 6.0, accent)?;
        c.text(14.0, 17.0, 11.0, Font::Bold, theme.text, rec.title)?;
        c.text(w - 80.0, 17.0, SMALL_SIZE, Font::Bold, accent, badge)?;
        let mut y = 24.0 + BODY_SIZE;
        for line in body {
            c.text(14.0, y, BODY_SIZE, Font::Regular, theme.text, line)?;
            y += lead;
        }
        Ok(())
    })?;
    Ok(())
}
