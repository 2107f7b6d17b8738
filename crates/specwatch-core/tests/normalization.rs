//! Integration tests for normalizing raw linter output.

use serde_json::json;
use specwatch_core::{normalize, normalize_str, Category, NormalizationError, Severity};

#[test]
fn mixed_provider_fields_normalize_to_canonical_issues() {
    let raw = json!([
        {
            "ruleName": "operation-description",
            "message": "Operation must have a description",
            "severity": "warning",
            "pointer": "/paths/~1pets/get"
        },
        {
            "code": "oas3-schema",
            "description": "Property `type` is required",
            "severity": 0,
            "path": ["components", "schemas", "Pet"],
            "range": { "start": { "line": 11, "character": 3 } }
        },
        {
            "rule": "info-contact",
            "message": "Info object should contain contact",
            "severity": "hint"
        }
    ]);

    let scan = normalize(&raw).unwrap();
    assert_eq!(scan.issues.len(), 3);

    // errors sort first
    let first = &scan.issues[0];
    assert_eq!(first.code, "oas3-schema");
    assert_eq!(first.severity, Severity::Error);
    assert_eq!(first.category, Category::SpecCompliance);
    assert_eq!(first.location.path, "components.schemas.Pet");
    assert_eq!(first.location.line, Some(12));
    assert_eq!(first.location.column, Some(4));

    let second = &scan.issues[1];
    assert_eq!(second.code, "operation-description");
    assert_eq!(second.category, Category::Documentation);
    assert_eq!(second.location.path, "/paths/~1pets/get");

    assert_eq!(scan.issues[2].severity, Severity::Hint);

    assert_eq!(scan.summary.total_issues, 3);
    assert_eq!(scan.summary.errors, 1);
    assert_eq!(scan.summary.warnings, 1);
    assert_eq!(scan.summary.hints, 1);
    assert!(!scan.summary.passed);
    assert_eq!(scan.summary.score, 87);
}

#[test]
fn empty_list_is_a_perfect_scan() {
    let scan = normalize(&json!([])).unwrap();
    assert!(scan.issues.is_empty());
    assert_eq!(scan.summary.total_issues, 0);
    assert_eq!(scan.summary.score, 100);
    assert!(scan.summary.passed);
    assert!(scan.summary.categories.is_empty());
}

#[test]
fn malformed_records_are_kept_with_defaults() {
    let scan = normalize(&json!([42, null, {"severity": "catastrophic"}])).unwrap();
    assert_eq!(scan.issues.len(), 3);
    for issue in &scan.issues {
        assert_eq!(issue.code, "unknown-rule");
        assert_eq!(issue.message, "No description provided");
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.category, Category::General);
        assert_eq!(issue.location.path, "");
    }
    assert_eq!(scan.summary.score, 91);
}

#[test]
fn many_errors_clamp_score_to_zero() {
    let raw: Vec<_> = (0..15)
        .map(|i| json!({"code": format!("rule-{i}"), "severity": "error"}))
        .collect();
    let scan = normalize(&serde_json::Value::Array(raw)).unwrap();
    assert_eq!(scan.summary.errors, 15);
    assert_eq!(scan.summary.score, 0);
}

#[test]
fn severity_sort_is_stable() {
    let raw = json!([
        {"code": "a", "severity": "warn"},
        {"code": "b", "severity": "error"},
        {"code": "c", "severity": "warn"},
        {"code": "d", "severity": "error"}
    ]);
    let scan = normalize(&raw).unwrap();
    let codes: Vec<&str> = scan.issues.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(codes, vec!["b", "d", "a", "c"]);
}

#[test]
fn non_sequence_input_is_rejected() {
    let err = normalize(&json!({"errors": []})).unwrap_err();
    assert!(matches!(err, NormalizationError::NotASequence { found: "object" }));

    let err = normalize_str("not json").unwrap_err();
    assert!(matches!(err, NormalizationError::InvalidJson(_)));
}
