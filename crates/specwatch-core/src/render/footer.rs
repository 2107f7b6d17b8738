//! Finalization stamp: footer bar and page numbering.

use super::blocks::SMALL_SIZE;
use super::config::RenderConfig;
use super::document::{Canvas, Document, Font};
use super::text::{text_width, truncate};
use crate::domain::RenderError;

pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} of {}", index + 1, total)
}

/// Stamp every buffered page. Must run after all content is placed.
pub fn finalize(doc: &mut Document, config: &RenderConfig) -> Result<(), RenderError> {
    let geometry = *doc.geometry();
    doc.finalize(|c, index, total| stamp(c, config, geometry.margin_left, geometry.margin_right, index, total))
}

fn stamp(
    c: &mut Canvas,
    config: &RenderConfig,
    left: f32,
    right: f32,
    index: usize,
    total: usize,
) -> Result<(), RenderError> {
    let theme = &config.theme;
    let w = c.width();
    let baseline = 28.0;

    c.line(left, 12.0, w - right, 12.0, 0.75, theme.rule)?;
    c.rect(left, 12.0, 40.0, 2.0, theme.primary)?;

    let label = page_label(index, total);
    let label_x = w - right - text_width(&label, SMALL_SIZE);
    let brand = if config.footer_text.is_empty() {
        config.brand.clone()
    } else {
        format!("{} | {}", config.brand, config.footer_text)
    };
    let brand = truncate(&brand, SMALL_SIZE, (label_x - left - 12.0).max(0.0));

    c.text(left, baseline, SMALL_SIZE, Font::Bold, theme.muted, brand)?;
    c.text(label_x.max(left), baseline, SMALL_SIZE, Font::Regular, theme.muted, label)
}
