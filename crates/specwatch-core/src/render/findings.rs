//! Detailed findings: one block per issue, or an empty-state block.

use super::blocks::{heading, BODY_SIZE, SMALL_SIZE};
use super::config::RenderConfig;
use super::document::{BlockKind, Document, Font};
use super::text::{line_height, truncate, wrap};
use crate::domain::{Issue, RenderError};

/// Text shown when a scan reports nothing.
pub const EMPTY_STATE_TEXT: &str = "No issues found";

const STRIP_WIDTH: f32 = 4.0;
const INDENT: f32 = 14.0;
/// Longest message rendered in full; longer ones are truncated to keep each
/// entry well below a page.
const MAX_MESSAGE_LINES: usize = 12;

pub fn draw(doc: &mut Document, issues: &[Issue], config: &RenderConfig) -> Result<(), RenderError> {
    heading(doc, config, "Detailed Findings")?;

    if issues.is_empty() {
        return empty_state(doc, config);
    }

    for issue in issues {
        issue_entry(doc, issue, config)?;
    }
    doc.advance(16.0);
    Ok(())
}

fn empty_state(doc: &mut Document, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    doc.place(BlockKind::EmptyState, 56.0, |c| {
        let w = c.width();
        c.rect(0.0, 0.0, w, 48.0, theme.panel)?;
        c.rect(0.0, 0.0, STRIP_WIDTH, 48.0, theme.success)?;
        c.text(INDENT, 21.0, 12.0, Font::Bold, theme.success, EMPTY_STATE_TEXT)?;
        c.text(
            INDENT,
            38.0,
            SMALL_SIZE,
            Font::Regular,
            theme.muted,
            "The linter reported no violations for this definition.",
        )
    })?;
    Ok(())
}

fn issue_entry(doc: &mut Document, issue: &Issue, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    let color = config.severity_color(issue.severity);
    let text_width = doc.geometry().content_width() - INDENT;
    let lead = line_height(BODY_SIZE);

    let mut message = wrap(&issue.message, BODY_SIZE, text_width);
    if message.len() > MAX_MESSAGE_LINES {
        message.truncate(MAX_MESSAGE_LINES);
        if let Some(last) = message.last_mut() {
            *last = truncate(&format!("{last} ..."), BODY_SIZE, text_width);
        }
    }
    let location = truncate(
        &format!("Location: {}", issue.location),
        SMALL_SIZE,
        text_width,
    );
    let title = truncate(&issue.code, BODY_SIZE, text_width - 70.0);
    let badge = issue.severity.label().to_uppercase();

    // title row + message lines + location row + padding
    let height = 22.0 + message.len() as f32 * lead + 16.0 + 8.0;

    doc.place(BlockKind::IssueEntry, height, |c| {
        let w = c.width();
        let body = height - 8.0;
        c.rect(0.0, 0.0, STRIP_WIDTH, body, color)?;
        c.text(INDENT, 15.0, BODY_SIZE, Font::Bold, theme.text, title)?;
        let badge_x = w - 60.0;
        c.rect(badge_x, 4.0, 60.0, 14.0, color)?;
        c.text(badge_x + 6.0, 14.0, 7.5, Font::Bold, theme.on_accent, badge)?;

        let mut y = 22.0 + BODY_SIZE;
        for line in message {
            c.text(INDENT, y, BODY_SIZE, Font::Regular, theme.text, line)?;
            y += lead;
        }
        c.text(INDENT, y + 2.0, SMALL_SIZE, Font::Regular, theme.muted, location)?;
        c.line(0.0, body + 4.0, w, body + 4.0, 0.5, theme.rule)
    })?;
    Ok(())
}
