//! Minimal PDF 1.4 writer for finalized documents.
//!
//! Only the primitives the compositor emits are supported: filled
//! rectangles, stroked lines and text in the two standard Helvetica faces.
//! Standard fonts need no embedding, so the output stays small and
//! dependency-free.

use std::io::Write;

use super::config::Color;
use super::document::{Document, Font, Page, Primitive};
use crate::domain::RenderError;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const FIRST_PAGE: usize = 5;

/// Serialize a finalized document to PDF bytes.
pub fn encode_pdf(doc: &Document) -> Result<Vec<u8>, RenderError> {
    if !doc.is_finalized() {
        return Err(RenderError::NotFinalized);
    }
    let geometry = doc.geometry();
    let page_ids: Vec<usize> = (0..doc.page_count()).map(|i| FIRST_PAGE + 2 * i).collect();

    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets.push(out.len());
    write!(out, "{CATALOG} 0 obj\n<< /Type /Catalog /Pages {PAGES} 0 R >>\nendobj\n")?;

    offsets.push(out.len());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    write!(
        out,
        "{PAGES} 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
        kids.join(" "),
        page_ids.len()
    )?;

    for (id, base) in [(FONT_REGULAR, "Helvetica"), (FONT_BOLD, "Helvetica-Bold")] {
        offsets.push(out.len());
        write!(
            out,
            "{id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>\nendobj\n"
        )?;
    }

    for (page, id) in doc.pages().iter().zip(&page_ids) {
        let content = content_stream(page, geometry.height)?;

        offsets.push(out.len());
        write!(
            out,
            "{id} 0 obj\n<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R >> >> \
             /Contents {} 0 R >>\nendobj\n",
            num(geometry.width),
            num(geometry.height),
            id + 1
        )?;

        offsets.push(out.len());
        write!(out, "{} 0 obj\n<< /Length {} >>\nstream\n", id + 1, content.len())?;
        out.extend_from_slice(&content);
        out.extend_from_slice(b"\nendstream\nendobj\n");
    }

    let xref = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1)?;
    for offset in &offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root {CATALOG} 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        offsets.len() + 1
    )?;
    Ok(out)
}

fn content_stream(page: &Page, page_height: f32) -> Result<Vec<u8>, RenderError> {
    let mut s: Vec<u8> = Vec::new();
    // Layout coordinates grow downward; PDF user space grows upward.
    let flip = |y: f32| page_height - y;

    for op in page.ops() {
        match &op.primitive {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                writeln!(
                    s,
                    "{} rg {} {} {} {} re f",
                    rgb(*fill),
                    num(*x),
                    num(flip(y + height)),
                    num(*width),
                    num(*height)
                )?;
            }
            Primitive::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                let face = match font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                writeln!(
                    s,
                    "BT /{face} {} Tf {} rg {} {} Td ({}) Tj ET",
                    num(*size),
                    rgb(*color),
                    num(*x),
                    num(flip(*y)),
                    escape(text)
                )?;
            }
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
                color,
            } => {
                writeln!(
                    s,
                    "{} RG {} w {} {} m {} {} l S",
                    rgb(*color),
                    num(*thickness),
                    num(*x1),
                    num(flip(*y1)),
                    num(*x2),
                    num(flip(*y2))
                )?;
            }
        }
    }
    Ok(s)
}

fn num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn rgb(c: Color) -> String {
    let f = |v: u8| num(f32::from(v) / 255.0);
    format!("{} {} {}", f(c.r), f(c.g), f(c.b))
}

/// Escape a PDF literal string. Characters outside printable ASCII are
/// replaced with `?` since the standard fonts use a single-byte encoding.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::config::PageGeometry;
    use crate::render::document::BlockKind;

    fn finalized(pages: usize) -> Document {
        let mut doc = Document::new(PageGeometry::default());
        for i in 0..pages {
            doc.start_new_page().unwrap();
            doc.place(BlockKind::Paragraph, 40.0, |c| {
                c.rect(0.0, 0.0, 100.0, 20.0, Color::rgb(255, 0, 0))?;
                c.text(0.0, 30.0, 10.0, Font::Bold, Color::rgb(0, 0, 0), format!("page (#{i})"))
            })
            .unwrap();
        }
        doc.finalize(|_, _, _| Ok(())).unwrap();
        doc
    }

    #[test]
    fn unfinalized_document_is_rejected() {
        let doc = Document::new(PageGeometry::default());
        assert!(matches!(encode_pdf(&doc), Err(RenderError::NotFinalized)));
    }

    #[test]
    fn writes_header_pages_and_trailer() {
        let bytes = encode_pdf(&finalized(3)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.contains("/Count 3"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("(page \\(#2\\)) Tj"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = encode_pdf(&finalized(2)).unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        // catalog, pages, two fonts, then page + content per page
        assert_eq!(entries.len(), 8);
        // offsets are byte positions; the lossy string would shift them
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn y_axis_is_flipped() {
        let bytes = encode_pdf(&finalized(1)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        // rect at top 50 with height 20 on an 842pt page
        assert!(text.contains("1 0 0 rg 50 772 100 20 re f"));
    }

    #[test]
    fn escape_handles_delimiters_and_non_ascii() {
        assert_eq!(escape(r"a(b)c\d"), r"a\(b\)c\\d");
        assert_eq!(escape("café\n"), "caf??");
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(0.333_33), "0.33");
    }
}
