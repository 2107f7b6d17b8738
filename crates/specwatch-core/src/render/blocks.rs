//! Reusable content blocks shared by the report sections.

use super::config::{Color, RenderConfig};
use super::document::{BlockKind, Document, Font};
use super::text::{line_height, truncate, wrap};
use crate::domain::RenderError;

pub const HEADING_SIZE: f32 = 16.0;
pub const BODY_SIZE: f32 = 10.0;
pub const SMALL_SIZE: f32 = 8.5;

/// Space a heading asks to keep free below itself.
const HEADING_KEEP: f32 = 60.0;

/// Section heading with an underline rule, kept together with the next block.
pub fn heading(doc: &mut Document, config: &RenderConfig, title: &str) -> Result<(), RenderError> {
    let height = 34.0;
    let primary = config.theme.primary;
    let rule = config.theme.rule;
    doc.place_keeping(BlockKind::Heading, height, HEADING_KEEP, |c| {
        let width = c.width();
        c.text(0.0, 20.0, HEADING_SIZE, Font::Bold, primary, title)?;
        c.line(0.0, 27.0, width, 27.0, 1.0, rule)
    })?;
    Ok(())
}

/// Wrapped paragraph. Tall paragraphs are split into page-sized chunks
/// so no single block exceeds the usable page height.
pub fn paragraph(
    doc: &mut Document,
    text: &str,
    size: f32,
    color: Color,
) -> Result<(), RenderError> {
    let lead = line_height(size);
    let lines = wrap(text, size, doc.geometry().content_width());
    let per_block = ((doc.geometry().usable_height() - 6.0) / lead).floor().max(1.0) as usize;

    for chunk in lines.chunks(per_block) {
        let height = chunk.len() as f32 * lead + 6.0;
        doc.place(BlockKind::Paragraph, height, |c| {
            for (i, line) in chunk.iter().enumerate() {
                c.text(0.0, size + i as f32 * lead, size, Font::Regular, color, line.as_str())?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// One-line entry, truncated to the content width.
pub fn single_line(
    doc: &mut Document,
    kind: BlockKind,
    text: &str,
    indent: f32,
    size: f32,
    color: Color,
) -> Result<(), RenderError> {
    let height = line_height(size) + 2.0;
    let max_width = doc.geometry().content_width() - indent;
    let shown = truncate(text, size, max_width);
    doc.place(kind, height, |c| {
        c.text(indent, size, size, Font::Regular, color, shown)
    })?;
    Ok(())
}

/// A row of equally wide labelled value tiles.
pub struct Tile {
    pub label: String,
    pub value: String,
    pub color: Color,
}

pub fn tile_row(doc: &mut Document, config: &RenderConfig, tiles: &[Tile]) -> Result<(), RenderError> {
    if tiles.is_empty() {
        return Ok(());
    }
    let height = 62.0;
    let gap = 10.0;
    let panel = config.theme.panel;
    let muted = config.theme.muted;
    doc.place(BlockKind::StatTiles, height, |c| {
        let count = tiles.len() as f32;
        let width = (c.width() - gap * (count - 1.0)) / count;
        for (i, tile) in tiles.iter().enumerate() {
            let x = i as f32 * (width + gap);
            c.rect(x, 0.0, width, 56.0, panel)?;
            c.rect(x, 0.0, 4.0, 56.0, tile.color)?;
            c.text(x + 12.0, 28.0, 20.0, Font::Bold, tile.color, tile.value.as_str())?;
            c.text(x + 12.0, 46.0, SMALL_SIZE, Font::Regular, muted, tile.label.as_str())?;
        }
        Ok(())
    })?;
    Ok(())
}

/// Signed number with an explicit `+` for positive values.
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// `"1 issue"` / `"3 issues"`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
