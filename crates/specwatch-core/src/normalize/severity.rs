//! Upstream severity mapping.

use serde_json::Value;

use crate::domain::Severity;

/// Severity assigned when the upstream value is missing or unrecognized.
pub const DEFAULT_SEVERITY: Severity = Severity::Warning;

/// Map a textual severity, case-insensitively.
pub fn parse_severity(raw: &str) -> Severity {
    match raw.trim().to_ascii_uppercase().as_str() {
        "ERROR" | "0" => Severity::Error,
        "WARN" | "WARNING" | "1" => Severity::Warning,
        "INFO" | "INFORMATION" | "2" => Severity::Information,
        "HINT" | "3" => Severity::Hint,
        _ => DEFAULT_SEVERITY,
    }
}

/// Map a numeric severity code.
pub fn severity_from_code(code: i64) -> Severity {
    match code {
        0 => Severity::Error,
        1 => Severity::Warning,
        2 => Severity::Information,
        3 => Severity::Hint,
        _ => DEFAULT_SEVERITY,
    }
}

/// Map a loosely-typed JSON severity field.
pub fn severity_from_value(value: Option<&Value>) -> Severity {
    match value {
        Some(Value::String(s)) => parse_severity(s),
        Some(Value::Number(n)) => n.as_i64().map(severity_from_code).unwrap_or(DEFAULT_SEVERITY),
        _ => DEFAULT_SEVERITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_mapping_is_case_insensitive() {
        assert_eq!(parse_severity("error"), Severity::Error);
        assert_eq!(parse_severity("Warn"), Severity::Warning);
        assert_eq!(parse_severity("WARNING"), Severity::Warning);
        assert_eq!(parse_severity("information"), Severity::Information);
        assert_eq!(parse_severity("Info"), Severity::Information);
        assert_eq!(parse_severity("hint"), Severity::Hint);
        assert_eq!(parse_severity(" 2 "), Severity::Information);
    }

    #[test]
    fn unknown_values_default_to_warning() {
        assert_eq!(parse_severity("fatal"), Severity::Warning);
        assert_eq!(severity_from_code(9), Severity::Warning);
        assert_eq!(severity_from_code(-1), Severity::Warning);
        assert_eq!(severity_from_value(None), Severity::Warning);
        assert_eq!(severity_from_value(Some(&json!(null))), Severity::Warning);
        assert_eq!(severity_from_value(Some(&json!(1.5))), Severity::Warning);
    }

    #[test]
    fn numeric_codes() {
        assert_eq!(severity_from_value(Some(&json!(0))), Severity::Error);
        assert_eq!(severity_from_value(Some(&json!(3))), Severity::Hint);
        assert_eq!(severity_from_value(Some(&json!("1"))), Severity::Warning);
    }
}
