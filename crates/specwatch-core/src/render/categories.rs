//! Category analysis: proportional bars and sample issues per category.

use super::blocks::{heading, paragraph, plural, single_line, BODY_SIZE, SMALL_SIZE};
use super::config::RenderConfig;
use super::document::{BlockKind, Document, Font};
use super::text::truncate;
use super::ReportPayload;
use crate::domain::{CategoryStats, RenderError};

const BAR_HEIGHT: f32 = 14.0;
const LABEL_COLUMN: f32 = 150.0;
const COUNT_COLUMN: f32 = 70.0;

/// Widths of the error, warning and remaining segments of one category bar.
///
/// The whole bar is `count / max_count * max_bar_width`; each segment takes
/// its share of that bar.
pub fn bar_segments(stats: &CategoryStats, max_count: u32, max_bar_width: f32) -> [f32; 3] {
    if stats.count == 0 || max_count == 0 {
        return [0.0; 3];
    }
    let count = stats.count as f32;
    let bar = count / max_count as f32 * max_bar_width;
    [stats.errors, stats.warnings, stats.other()].map(|seg| seg as f32 / count * bar)
}

pub fn draw(doc: &mut Document, payload: &ReportPayload<'_>, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    heading(doc, config, "Category Analysis")?;

    let rows = payload.summary.categories_by_count();
    let Some(max_count) = rows.first().map(|(_, stats)| stats.count) else {
        paragraph(
            doc,
            "No issues were reported, so there is nothing to break down by category.",
            BODY_SIZE,
            theme.muted,
        )?;
        doc.advance(16.0);
        return Ok(());
    };

    let max_bar = config
        .max_bar_width
        .min(doc.geometry().content_width() - LABEL_COLUMN - COUNT_COLUMN)
        .max(0.0);

    for (category, stats) in rows {
        let segments = bar_segments(&stats, max_count, max_bar);
        let colors = [theme.error, theme.warning, theme.info];
        let label = truncate(category.name(), BODY_SIZE, LABEL_COLUMN - 10.0);
        let count = plural(stats.count as usize, "issue");

        doc.place_keeping(BlockKind::CategoryBar, 24.0, 14.0, |c| {
            c.text(0.0, 15.0, BODY_SIZE, Font::Bold, theme.text, label)?;
            let mut x = LABEL_COLUMN;
            for (width, color) in segments.into_iter().zip(colors) {
                if width > 0.0 {
                    c.rect(x, 4.0, width, BAR_HEIGHT, color)?;
                    x += width;
                }
            }
            c.text(x + 8.0, 15.0, SMALL_SIZE, Font::Regular, theme.muted, count)
        })?;

        let limit = config.category_sample_limit;
        let samples: Vec<_> = payload
            .issues
            .iter()
            .filter(|issue| issue.category == category)
            .collect();
        for issue in samples.iter().take(limit) {
            let line = format!("[{}] {}: {}", issue.severity, issue.code, issue.message);
            single_line(doc, BlockKind::IssueLine, &line, 14.0, SMALL_SIZE, theme.text)?;
        }
        if samples.len() > limit {
            let more = format!("... and {} more", samples.len() - limit);
            single_line(doc, BlockKind::Overflow, &more, 14.0, SMALL_SIZE, theme.muted)?;
        }
        doc.advance(6.0);
    }
    doc.advance(10.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(count: u32, errors: u32, warnings: u32) -> CategoryStats {
        CategoryStats {
            count,
            errors,
            warnings,
        }
    }

    #[test]
    fn largest_category_fills_the_bar() {
        let [e, w, o] = bar_segments(&stats(10, 2, 3), 10, 300.0);
        assert!((e - 60.0).abs() < 1e-3);
        assert!((w - 90.0).abs() < 1e-3);
        assert!((o - 150.0).abs() < 1e-3);
    }

    #[test]
    fn smaller_category_scales_down() {
        let segments = bar_segments(&stats(5, 5, 0), 10, 300.0);
        assert!((segments[0] - 150.0).abs() < 1e-3);
        assert_eq!(segments[1], 0.0);
        assert_eq!(segments[2], 0.0);
        assert!((segments.iter().sum::<f32>() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn empty_stats_have_no_bar() {
        assert_eq!(bar_segments(&stats(0, 0, 0), 10, 300.0), [0.0; 3]);
        assert_eq!(bar_segments(&stats(3, 1, 1), 0, 300.0), [0.0; 3]);
    }
}
