//! Report compositor.
//!
//! Lays out a paginated quality report from a scan summary, the issue list
//! and an optional diff. Rendering happens in two passes over a buffered
//! [`Document`]: content blocks are placed in fixed section order, then
//! every page is stamped with its footer once the page count is known.
//! [`encode_pdf`] turns the finalized document into bytes. Nothing here
//! performs I/O.

pub mod blocks;
pub mod categories;
pub mod changes;
pub mod config;
pub mod cover;
pub mod document;
pub mod findings;
pub mod footer;
pub mod pdf;
pub mod recommendations;
pub mod summary;
pub mod text;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::diff::DiffReport;
use crate::domain::{Issue, RenderError, ScanIdentity, Summary};

pub use config::{Color, PageGeometry, RenderConfig, Theme};
pub use document::{BlockKind, Document, Font, Page, Placement, Primitive};
pub use pdf::encode_pdf;
pub use recommendations::{recommendations, Priority, Recommendation};

/// Everything the compositor needs for one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportPayload<'a> {
    pub identity: &'a ScanIdentity,
    pub summary: &'a Summary,
    pub issues: &'a [Issue],
    pub diff: Option<&'a DiffReport>,
    pub generated_at: DateTime<Utc>,
}

/// Lay out and finalize the report.
///
/// Sections: cover, executive summary, changes (only when a baseline
/// existed), detailed findings, category analysis, recommendations.
pub fn render(payload: &ReportPayload<'_>, config: &RenderConfig) -> Result<Document, RenderError> {
    let mut doc = Document::new(config.page);

    cover::draw(&mut doc, payload, config)?;
    doc.start_new_page()?;
    summary::draw(&mut doc, payload, config)?;

    if let Some(diff) = payload.diff.filter(|d| !d.is_first_scan) {
        changes::draw(&mut doc, diff, config)?;
    }

    findings::draw(&mut doc, payload.issues, config)?;
    categories::draw(&mut doc, payload, config)?;
    if config.show_recommendations {
        recommendations::draw(&mut doc, payload.summary, config)?;
    }

    footer::finalize(&mut doc, config)?;
    debug!(
        subject = %payload.identity,
        pages = doc.page_count(),
        "report laid out"
    );
    Ok(doc)
}

/// [`render`] followed by [`encode_pdf`].
pub fn render_pdf(payload: &ReportPayload<'_>, config: &RenderConfig) -> Result<(Vec<u8>, usize), RenderError> {
    let doc = render(payload, config)?;
    let bytes = encode_pdf(&doc)?;
    Ok((bytes, doc.page_count()))
}
