//! "Changes since last scan" section, drawn only when a baseline existed.

use super::blocks::{heading, signed, single_line, BODY_SIZE, SMALL_SIZE};
use super::config::{Color, RenderConfig};
use super::document::{BlockKind, Document, Font};
use super::text::text_width;
use crate::diff::DiffReport;
use crate::domain::{Issue, RenderError};

pub fn draw(doc: &mut Document, diff: &DiffReport, config: &RenderConfig) -> Result<(), RenderError> {
    heading(doc, config, "Changes Since Last Scan")?;
    score_comparison(doc, diff, config)?;
    delta_row(doc, diff, config)?;
    doc.advance(6.0);

    issue_preview(
        doc,
        config,
        "Resolved issues",
        &diff.resolved_issues,
        config.theme.success,
    )?;
    issue_preview(doc, config, "New issues", &diff.new_issues, config.theme.error)?;

    single_line(
        doc,
        BlockKind::Paragraph,
        &format!("Unchanged issues: {}", diff.persisting_issues.len()),
        0.0,
        BODY_SIZE,
        config.theme.muted,
    )?;
    doc.advance(16.0);
    Ok(())
}

fn score_comparison(doc: &mut Document, diff: &DiffReport, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    let previous = diff.previous_score.unwrap_or(0);
    let change = i64::from(diff.score_change);
    let badge_color = config.delta_color(change);
    let badge = signed(change);

    doc.place(BlockKind::ScoreComparison, 66.0, |c| {
        let w = c.width();
        let tile = (w - 20.0) / 3.0;
        let tiles = [
            ("Previous score", previous.to_string(), config.score_color(previous)),
            ("Current score", diff.current_score.to_string(), config.score_color(diff.current_score)),
        ];
        for (i, (label, value, color)) in tiles.into_iter().enumerate() {
            let x = i as f32 * (tile + 10.0);
            c.rect(x, 0.0, tile, 58.0, theme.panel)?;
            c.rect(x, 0.0, 4.0, 58.0, color)?;
            c.text(x + 12.0, 30.0, 22.0, Font::Bold, color, value)?;
            c.text(x + 12.0, 48.0, SMALL_SIZE, Font::Regular, theme.muted, label)?;
        }
        let x = 2.0 * (tile + 10.0);
        c.rect(x, 0.0, tile, 58.0, badge_color)?;
        c.text(x + 12.0, 30.0, 22.0, Font::Bold, theme.on_accent, badge)?;
        c.text(x + 12.0, 48.0, SMALL_SIZE, Font::Regular, theme.on_accent, "Score change")
    })?;
    Ok(())
}

fn delta_row(doc: &mut Document, diff: &DiffReport, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    let d = diff.summary_delta;
    // Fewer issues is an improvement, so the colour uses the negated delta.
    let fields = [
        ("Total", d.total_issues),
        ("Errors", d.errors),
        ("Warnings", d.warnings),
        ("Info", d.infos),
        ("Hints", d.hints),
    ];

    doc.place(BlockKind::DeltaRow, 24.0, |c| {
        let slot = c.width() / fields.len() as f32;
        for (i, (label, value)) in fields.iter().enumerate() {
            let x = i as f32 * slot;
            c.text(x, 14.0, SMALL_SIZE, Font::Regular, theme.muted, format!("{label}:"))?;
            let offset = text_width(label, SMALL_SIZE) + 8.0;
            c.text(
                x + offset,
                14.0,
                SMALL_SIZE,
                Font::Bold,
                config.delta_color(-value),
                signed(*value),
            )?;
        }
        Ok(())
    })?;
    Ok(())
}

fn issue_preview(
    doc: &mut Document,
    config: &RenderConfig,
    title: &str,
    issues: &[Issue],
    accent: Color,
) -> Result<(), RenderError> {
    let theme = &config.theme;
    let caption = format!("{title} ({})", issues.len());
    doc.place_keeping(BlockKind::Paragraph, 20.0, 16.0, |c| {
        c.rect(0.0, 4.0, 3.0, 12.0, accent)?;
        c.text(10.0, 14.0, BODY_SIZE, Font::Bold, theme.text, caption)
    })?;

    if issues.is_empty() {
        return single_line(doc, BlockKind::IssueLine, "None", 10.0, SMALL_SIZE, theme.muted);
    }

    let limit = config.diff_preview_limit;
    for issue in issues.iter().take(limit) {
        let line = format!("[{}] {}: {} ({})", issue.severity, issue.code, issue.message, issue.location);
        single_line(doc, BlockKind::IssueLine, &line, 10.0, SMALL_SIZE, theme.text)?;
    }
    if issues.len() > limit {
        let more = format!("... and {} more", issues.len() - limit);
        single_line(doc, BlockKind::Overflow, &more, 10.0, SMALL_SIZE, theme.muted)?;
    }
    doc.advance(4.0);
    Ok(())
}
