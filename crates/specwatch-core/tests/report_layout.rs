//! Integration tests for report composition and pagination.

use chrono::{TimeZone, Utc};
use specwatch_core::render::{recommendations, BlockKind, Priority};
use specwatch_core::{
    compare, encode_pdf, render, render_pdf, Category, Document, Issue, Location, NormalizedScan,
    RenderConfig, RenderError, ReportPayload, ScanIdentity, ScanSnapshot, Severity, Summary,
};

fn issue(i: usize, severity: Severity, category: Category) -> Issue {
    Issue {
        code: format!("rule-{i}"),
        message: format!("Violation number {i} with a reasonably descriptive message"),
        severity,
        category,
        location: Location::new(format!("/paths/~1items~1{i}/get")),
    }
}

fn scan(issues: Vec<Issue>) -> NormalizedScan {
    let summary = Summary::from_issues(&issues);
    NormalizedScan { issues, summary }
}

fn identity() -> ScanIdentity {
    ScanIdentity::new("acme", "petstore", "2.1.0")
}

fn render_scan(scan: &NormalizedScan, diff: Option<&specwatch_core::DiffReport>) -> Document {
    let identity = identity();
    let payload = ReportPayload {
        identity: &identity,
        summary: &scan.summary,
        issues: &scan.issues,
        diff,
        generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
    };
    render(&payload, &RenderConfig::default()).unwrap()
}

fn any_page(doc: &Document, needle: &str) -> bool {
    doc.pages().iter().any(|p| p.contains_text(needle))
}

#[test]
fn clean_scan_shows_empty_state_and_maintain_recommendation() {
    let doc = render_scan(&scan(vec![]), None);

    assert!(doc.is_finalized());
    assert!(doc.pages()[0].has_block(BlockKind::Cover));
    assert!(doc.pages()[0].contains_text("PASSED"));
    assert!(any_page(&doc, "No issues found"));
    assert!(any_page(&doc, "Maintain current quality"));
    assert!(!doc.pages().iter().any(|p| p.has_block(BlockKind::IssueEntry)));
    assert!(!any_page(&doc, "Changes Since Last Scan"));
}

#[test]
fn cover_sits_alone_on_first_page() {
    let doc = render_scan(&scan(vec![issue(1, Severity::Error, Category::Security)]), None);
    let first = &doc.pages()[0];
    assert!(first.contains_text("FAILED"));
    assert!(first.contains_text("acme / petstore"));
    assert!(!first.contains_text("Executive Summary"));
    assert!(doc.pages()[1].contains_text("Executive Summary"));
}

#[test]
fn first_scan_diff_omits_changes_section() {
    let current = scan(vec![issue(1, Severity::Warning, Category::Structure)]);
    let diff = compare(&current, None);
    let doc = render_scan(&current, Some(&diff));
    assert!(!any_page(&doc, "Changes Since Last Scan"));
}

#[test]
fn changes_section_lists_new_and_resolved_with_overflow() {
    let previous = scan((0..20).map(|i| issue(i, Severity::Warning, Category::Structure)).collect());
    let current = scan((10..40).map(|i| issue(i, Severity::Error, Category::Structure)).collect());
    let snapshot = ScanSnapshot::new(
        &identity(),
        previous.summary.clone(),
        previous.issues.clone(),
        Utc::now(),
    );
    let diff = compare(&current, Some(&snapshot));
    assert_eq!(diff.new_issues.len(), 20);
    assert_eq!(diff.resolved_issues.len(), 10);

    let doc = render_scan(&current, Some(&diff));
    assert!(any_page(&doc, "Changes Since Last Scan"));
    assert!(any_page(&doc, "Resolved issues (10)"));
    assert!(any_page(&doc, "New issues (20)"));
    assert!(any_page(&doc, "... and 5 more"));
    assert!(any_page(&doc, "Unchanged issues: 10"));

    // section order: changes precede detailed findings
    let page_of = |needle: &str| doc.pages().iter().position(|p| p.contains_text(needle)).unwrap();
    assert!(page_of("Changes Since Last Scan") <= page_of("Detailed Findings"));
}

#[test]
fn large_scan_paginates_without_crossing_margins() {
    let categories = Category::ALL;
    let issues: Vec<Issue> = (0..120)
        .map(|i| issue(i, Severity::ALL[i % 4], categories[i % categories.len()]))
        .collect();
    let doc = render_scan(&scan(issues), None);

    assert!(doc.page_count() > 5);
    let geometry = *doc.geometry();
    let total = doc.page_count();
    for (i, page) in doc.pages().iter().enumerate() {
        assert!(page.contains_text(&format!("Page {} of {}", i + 1, total)));
        for block in page.blocks() {
            if block.kind == BlockKind::Footer {
                continue;
            }
            assert!(block.top >= geometry.content_top() - 0.01);
            assert!(
                block.bottom() <= geometry.content_bottom() + 0.01,
                "{:?} on page {} ends at {}",
                block.kind,
                i + 1,
                block.bottom()
            );
        }
    }
}

#[test]
fn category_samples_are_capped() {
    let issues: Vec<Issue> = (0..9)
        .map(|i| issue(i, Severity::Warning, Category::NamingConventions))
        .collect();
    let doc = render_scan(&scan(issues), None);
    assert!(any_page(&doc, "Category Analysis"));
    assert!(any_page(&doc, "... and 4 more"));
    assert!(doc.pages().iter().any(|p| p.has_block(BlockKind::CategoryBar)));
}

#[test]
fn recommendations_can_be_disabled() {
    let current = scan(vec![issue(1, Severity::Error, Category::Security)]);
    let identity = identity();
    let config = RenderConfig {
        show_recommendations: false,
        ..RenderConfig::default()
    };
    let payload = ReportPayload {
        identity: &identity,
        summary: &current.summary,
        issues: &current.issues,
        diff: None,
        generated_at: Utc::now(),
    };
    let doc = render(&payload, &config).unwrap();
    assert!(!doc.pages().iter().any(|p| p.has_block(BlockKind::Recommendation)));

    let recs = recommendations(&current.summary);
    assert_eq!(recs[0].priority, Priority::High);
}

#[test]
fn pdf_bytes_match_page_count() {
    let current = scan((0..60).map(|i| issue(i, Severity::Warning, Category::Documentation)).collect());
    let identity = identity();
    let payload = ReportPayload {
        identity: &identity,
        summary: &current.summary,
        issues: &current.issues,
        diff: None,
        generated_at: Utc::now(),
    };
    let (bytes, pages) = render_pdf(&payload, &RenderConfig::default()).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(text.contains(&format!("/Count {pages}")));
}

#[test]
fn undersized_page_is_a_render_error() {
    let current = scan(vec![]);
    let identity = identity();
    let mut config = RenderConfig::default();
    config.page.height = 300.0;
    let payload = ReportPayload {
        identity: &identity,
        summary: &current.summary,
        issues: &current.issues,
        diff: None,
        generated_at: Utc::now(),
    };
    let err = render(&payload, &config).unwrap_err();
    assert!(matches!(err, RenderError::BlockTooTall { kind: "cover", .. }));
}

#[test]
fn unfinalized_document_cannot_be_encoded() {
    let doc = Document::new(RenderConfig::default().page);
    assert!(matches!(encode_pdf(&doc), Err(RenderError::NotFinalized)));
}
