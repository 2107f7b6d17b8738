//! Executive summary: stat tiles, templated narrative and the category table.

use super::blocks::{heading, paragraph, plural, tile_row, Tile, BODY_SIZE, SMALL_SIZE};
use super::config::RenderConfig;
use super::document::{BlockKind, Document, Font};
use super::ReportPayload;
use crate::domain::{RenderError, Summary};

const ROW_HEIGHT: f32 = 20.0;

pub fn draw(doc: &mut Document, payload: &ReportPayload<'_>, config: &RenderConfig) -> Result<(), RenderError> {
    let summary = payload.summary;
    let theme = &config.theme;

    heading(doc, config, "Executive Summary")?;
    tile_row(
        doc,
        config,
        &[
            Tile {
                label: "Total issues".to_string(),
                value: summary.total_issues.to_string(),
                color: theme.primary,
            },
            Tile {
                label: "Errors".to_string(),
                value: summary.errors.to_string(),
                color: theme.error,
            },
            Tile {
                label: "Warnings".to_string(),
                value: summary.warnings.to_string(),
                color: theme.warning,
            },
            Tile {
                label: "Info".to_string(),
                value: summary.infos.to_string(),
                color: theme.info,
            },
        ],
    )?;
    doc.advance(8.0);
    paragraph(doc, &narrative(&payload.identity.subject, summary), BODY_SIZE, theme.text)?;
    doc.advance(8.0);
    category_table(doc, summary, config)?;
    doc.advance(16.0);
    Ok(())
}

/// Narrative sentence built from the summary counts and verdict.
pub fn narrative(subject: &str, summary: &Summary) -> String {
    let breakdown = format!(
        "{}, {}, {} informational and {}",
        plural(summary.errors as usize, "error"),
        plural(summary.warnings as usize, "warning"),
        summary.infos,
        plural(summary.hints as usize, "hint"),
    );
    if summary.total_issues == 0 {
        format!(
            "The {subject} definition passed validation with no issues reported. \
             Quality score: {}/100.",
            summary.score
        )
    } else if summary.passed {
        format!(
            "The {subject} definition passed validation. The linter reported {} ({breakdown}), \
             none of them blocking. Quality score: {}/100.",
            plural(summary.total_issues as usize, "issue"),
            summary.score
        )
    } else {
        format!(
            "The {subject} definition failed validation. The linter reported {} ({breakdown}); \
             the errors must be resolved before the definition can pass. Quality score: {}/100.",
            plural(summary.total_issues as usize, "issue"),
            summary.score
        )
    }
}

fn category_table(doc: &mut Document, summary: &Summary, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    let columns = |width: f32| [0.0, width * 0.55, width * 0.7, width * 0.85];

    doc.place_keeping(BlockKind::TableHeader, ROW_HEIGHT, ROW_HEIGHT, |c| {
        let w = c.width();
        let cols = columns(w);
        c.rect(0.0, 0.0, w, ROW_HEIGHT, theme.primary)?;
        for (x, label) in cols.iter().zip(["Category", "Issues", "Errors", "Warnings"]) {
            c.text(x + 6.0, 14.0, SMALL_SIZE, Font::Bold, theme.on_accent, label)?;
        }
        Ok(())
    })?;

    let rows = summary.categories_by_count();
    if rows.is_empty() {
        doc.place(BlockKind::TableRow, ROW_HEIGHT, |c| {
            c.text(6.0, 14.0, SMALL_SIZE, Font::Regular, theme.muted, "No categories affected")
        })?;
        return Ok(());
    }

    for (i, (category, stats)) in rows.iter().enumerate() {
        let shade = i % 2 == 1;
        doc.place(BlockKind::TableRow, ROW_HEIGHT, |c| {
            let w = c.width();
            let cols = columns(w);
            if shade {
                c.rect(0.0, 0.0, w, ROW_HEIGHT, theme.panel)?;
            }
            let cells = [
                category.name().to_string(),
                stats.count.to_string(),
                stats.errors.to_string(),
                stats.warnings.to_string(),
            ];
            for (x, cell) in cols.iter().zip(cells) {
                c.text(x + 6.0, 14.0, SMALL_SIZE, Font::Regular, theme.text, cell)?;
            }
            c.line(0.0, ROW_HEIGHT, w, ROW_HEIGHT, 0.5, theme.rule)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Issue, Location, Severity};

    fn summary(severities: &[Severity]) -> Summary {
        let issues: Vec<Issue> = severities
            .iter()
            .map(|s| Issue {
                code: "r".to_string(),
                message: String::new(),
                severity: *s,
                category: Category::General,
                location: Location::new(""),
            })
            .collect();
        Summary::from_issues(&issues)
    }

    #[test]
    fn narrative_for_clean_scan() {
        let text = narrative("petstore", &summary(&[]));
        assert!(text.contains("passed validation with no issues"));
        assert!(text.contains("100/100"));
    }

    #[test]
    fn narrative_for_passing_scan_with_warnings() {
        let text = narrative("petstore", &summary(&[Severity::Warning, Severity::Hint]));
        assert!(text.contains("passed validation"));
        assert!(text.contains("2 issues"));
        assert!(text.contains("1 warning,"));
        assert!(text.contains("1 hint"));
    }

    #[test]
    fn narrative_for_failing_scan() {
        let text = narrative("petstore", &summary(&[Severity::Error]));
        assert!(text.contains("failed validation"));
        assert!(text.contains("1 error,"));
        assert!(text.contains("must be resolved"));
        assert!(text.contains("90/100"));
    }
}
