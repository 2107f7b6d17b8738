//! Buffered two-pass document model.
//!
//! The content pass appends blocks to the current page and opens a new page
//! when a block would cross the bottom margin. Pages stay in memory so the
//! finalization pass can revisit each one by index once the total page count
//! is known.

use serde::Serialize;

use super::config::{Color, PageGeometry};
use crate::domain::RenderError;

const EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Font {
    Regular,
    Bold,
}

/// A draw primitive in absolute page coordinates (origin top-left, y down).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Primitive {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Color,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
    },
}

/// What a block on the page represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Cover,
    Heading,
    Paragraph,
    StatTiles,
    TableHeader,
    TableRow,
    ScoreComparison,
    DeltaRow,
    IssueLine,
    Overflow,
    IssueEntry,
    EmptyState,
    CategoryBar,
    Recommendation,
    Footer,
}

impl BlockKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::StatTiles => "stat tiles",
            Self::TableHeader => "table header",
            Self::TableRow => "table row",
            Self::ScoreComparison => "score comparison",
            Self::DeltaRow => "delta row",
            Self::IssueLine => "issue line",
            Self::Overflow => "overflow",
            Self::IssueEntry => "issue entry",
            Self::EmptyState => "empty state",
            Self::CategoryBar => "category bar",
            Self::Recommendation => "recommendation",
            Self::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(pub u32);

/// Vertical span reserved for one block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub id: BlockId,
    pub kind: BlockKind,
    pub top: f32,
    pub height: f32,
}

impl Placement {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawOp {
    pub block: BlockId,
    pub primitive: Primitive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    index: usize,
    cursor: f32,
    blocks: Vec<Placement>,
    ops: Vec<DrawOp>,
}

impl Page {
    fn new(index: usize, cursor: f32) -> Self {
        Self {
            index,
            cursor,
            blocks: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Next free y position.
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn blocks(&self) -> &[Placement] {
        &self.blocks
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_blank(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All text runs on the page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match &op.primitive {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn has_block(&self, kind: BlockKind) -> bool {
        self.blocks.iter().any(|b| b.kind == kind)
    }
}

/// Drawing surface for one block. Coordinates are relative to the block's
/// top-left corner; anything drawn outside the reserved box is an error.
pub struct Canvas {
    kind: BlockKind,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    primitives: Vec<Primitive>,
}

impl Canvas {
    fn new(kind: BlockKind, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            left,
            top,
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    fn check(&self, what: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Result<(), RenderError> {
        let inside = x0 >= -EPSILON
            && y0 >= -EPSILON
            && x1 <= self.width + EPSILON
            && y1 <= self.height + EPSILON;
        if inside {
            Ok(())
        } else {
            Err(RenderError::OutOfBounds {
                kind: self.kind.name(),
                detail: format!(
                    "{what} spans ({x0:.1},{y0:.1})-({x1:.1},{y1:.1}) in a {:.1}x{:.1} box",
                    self.width, self.height
                ),
            })
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Color) -> Result<(), RenderError> {
        self.check("rect", x, y, x + width, y + height)?;
        self.primitives.push(Primitive::Rect {
            x: self.left + x,
            y: self.top + y,
            width,
            height,
            fill,
        });
        Ok(())
    }

    /// Draw a text run with its baseline at `y`. Only the start position and
    /// the vertical extent are checked; callers wrap or truncate for width.
    pub fn text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Color,
        text: impl Into<String>,
    ) -> Result<(), RenderError> {
        self.check("text", x, y - size * 0.8, x, y + size * 0.2)?;
        self.primitives.push(Primitive::Text {
            x: self.left + x,
            y: self.top + y,
            size,
            font,
            color,
            text: text.into(),
        });
        Ok(())
    }

    pub fn line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
    ) -> Result<(), RenderError> {
        self.check("line", x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))?;
        self.primitives.push(Primitive::Line {
            x1: self.left + x1,
            y1: self.top + y1,
            x2: self.left + x2,
            y2: self.top + y2,
            thickness,
            color,
        });
        Ok(())
    }
}

/// Paginated document builder.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    geometry: PageGeometry,
    pages: Vec<Page>,
    next_block: u32,
    finalized: bool,
}

impl Document {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::new(0, geometry.content_top())],
            next_block: 0,
            finalized: false,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    // `new` always creates the first page and pages are never removed.
    fn current(&self) -> &Page {
        &self.pages[self.pages.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn push_page(&mut self) {
        let index = self.pages.len();
        self.pages.push(Page::new(index, self.geometry.content_top()));
    }

    /// Space left on the current page.
    pub fn remaining(&self) -> f32 {
        self.geometry.content_bottom() - self.current().cursor
    }

    /// Force subsequent content onto a fresh page. No-op on a blank page.
    pub fn start_new_page(&mut self) -> Result<(), RenderError> {
        if self.finalized {
            return Err(RenderError::AlreadyFinalized);
        }
        if !self.current().is_blank() {
            self.push_page();
        }
        Ok(())
    }

    /// Reserve `height` points for a block and draw it. The block moves to a
    /// new page if it does not fit on the current one.
    pub fn place<F>(&mut self, kind: BlockKind, height: f32, draw: F) -> Result<BlockId, RenderError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), RenderError>,
    {
        self.place_keeping(kind, height, 0.0, draw)
    }

    /// Like [`place`](Self::place), but also requires `keep_with_next` points
    /// of free space after the block, so headings do not end up orphaned at
    /// the bottom of a page.
    pub fn place_keeping<F>(
        &mut self,
        kind: BlockKind,
        height: f32,
        keep_with_next: f32,
        draw: F,
    ) -> Result<BlockId, RenderError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), RenderError>,
    {
        if self.finalized {
            return Err(RenderError::AlreadyFinalized);
        }
        let available = self.geometry.usable_height();
        if height > available + EPSILON {
            return Err(RenderError::BlockTooTall {
                kind: kind.name(),
                height,
                available,
            });
        }

        let needed = (height + keep_with_next).min(available);
        if needed > self.remaining() + EPSILON && !self.current().is_blank() {
            self.push_page();
        }

        let top = self.current().cursor;
        let mut canvas = Canvas::new(
            kind,
            self.geometry.margin_left,
            top,
            self.geometry.content_width(),
            height,
        );
        draw(&mut canvas)?;

        let id = self.allocate_id();
        let page = self.current_mut();
        page.blocks.push(Placement {
            id,
            kind,
            top,
            height,
        });
        page.ops.extend(
            canvas
                .primitives
                .into_iter()
                .map(|primitive| DrawOp { block: id, primitive }),
        );
        page.cursor = top + height;
        Ok(id)
    }

    /// Add vertical whitespace without opening a new page.
    pub fn advance(&mut self, gap: f32) {
        let bottom = self.geometry.content_bottom();
        let page = self.current_mut();
        page.cursor = (page.cursor + gap).min(bottom);
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        id
    }

    /// Second pass: visit every page by index with the final page count and
    /// let `stamp` draw into the footer band below the bottom margin.
    pub fn finalize<F>(&mut self, mut stamp: F) -> Result<(), RenderError>
    where
        F: FnMut(&mut Canvas, usize, usize) -> Result<(), RenderError>,
    {
        if self.finalized {
            return Err(RenderError::AlreadyFinalized);
        }
        let total = self.pages.len();
        let top = self.geometry.content_bottom();
        let height = self.geometry.margin_bottom;

        for index in 0..total {
            let mut canvas = Canvas::new(BlockKind::Footer, 0.0, top, self.geometry.width, height);
            stamp(&mut canvas, index, total)?;

            let id = self.allocate_id();
            let page = &mut self.pages[index];
            page.blocks.push(Placement {
                id,
                kind: BlockKind::Footer,
                top,
                height,
            });
            page.ops.extend(
                canvas
                    .primitives
                    .into_iter()
                    .map(|primitive| DrawOp { block: id, primitive }),
            );
        }

        self.finalized = true;
        Ok(())
    }
}
