//! Cover page: title, subject identity, score indicator and pass/fail banner.

use super::blocks::{BODY_SIZE, SMALL_SIZE};
use super::config::RenderConfig;
use super::document::{BlockKind, Document, Font};
use super::text::truncate;
use super::ReportPayload;
use crate::domain::RenderError;

const COVER_HEIGHT: f32 = 420.0;

pub fn draw(doc: &mut Document, payload: &ReportPayload<'_>, config: &RenderConfig) -> Result<(), RenderError> {
    let theme = &config.theme;
    let summary = payload.summary;
    let score_color = config.score_color(summary.score);
    let (banner_text, banner_color) = if summary.passed {
        ("PASSED", theme.success)
    } else {
        ("FAILED", theme.error)
    };
    let width = doc.geometry().content_width();
    let identity = truncate(
        &format!("{} / {}", payload.identity.owner, payload.identity.subject),
        18.0,
        width,
    );
    let version = format!("Version {}", payload.identity.version);
    let generated = format!(
        "Generated {}",
        payload.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let counts = truncate(
        &format!(
            "{} issues: {} errors, {} warnings, {} info, {} hints",
            summary.total_issues, summary.errors, summary.warnings, summary.infos, summary.hints
        ),
        SMALL_SIZE,
        width / 2.0 - 10.0,
    );

    doc.place(BlockKind::Cover, COVER_HEIGHT, |c| {
        let w = c.width();
        c.rect(0.0, 0.0, w, 90.0, theme.primary)?;
        c.text(20.0, 40.0, 24.0, Font::Bold, theme.on_accent, config.title.as_str())?;
        c.text(20.0, 68.0, BODY_SIZE, Font::Regular, theme.on_accent, config.brand.as_str())?;

        c.text(0.0, 140.0, 18.0, Font::Bold, theme.text, identity)?;
        c.text(0.0, 162.0, BODY_SIZE, Font::Regular, theme.muted, version)?;
        c.text(0.0, 178.0, BODY_SIZE, Font::Regular, theme.muted, generated)?;

        // Score indicator
        let tile = 120.0;
        let tile_x = (w - tile) / 2.0;
        c.rect(tile_x, 205.0, tile, tile, score_color)?;
        let score = summary.score.to_string();
        let score_x = tile_x + (tile - super::text::text_width(&score, 44.0)) / 2.0;
        c.text(score_x.max(tile_x), 278.0, 44.0, Font::Bold, theme.on_accent, score)?;
        c.text(tile_x + 38.0, 310.0, SMALL_SIZE, Font::Regular, theme.on_accent, "of 100")?;

        // Pass/fail banner
        c.rect(0.0, 345.0, w, 36.0, banner_color)?;
        c.text(20.0, 368.0, 14.0, Font::Bold, theme.on_accent, banner_text)?;
        c.text(w / 2.0, 368.0, SMALL_SIZE, Font::Regular, theme.on_accent, counts)?;
        Ok(())
    })?;
    Ok(())
}
