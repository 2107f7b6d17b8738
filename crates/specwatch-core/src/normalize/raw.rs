//! Field-tolerant extraction from upstream violation records.

use serde_json::{Map, Value};

use crate::domain::Location;

/// Rule code used when a record carries no rule identifier.
pub const UNKNOWN_RULE: &str = "unknown-rule";

/// Message used when a record carries no message.
pub const MISSING_MESSAGE: &str = "No description provided";

const RULE_KEYS: &[&str] = &["ruleName", "rule", "code"];
const MESSAGE_KEYS: &[&str] = &["message", "description"];
const PATH_KEYS: &[&str] = &["pointer", "path"];

/// Borrowed view over one raw record. Non-object records behave as empty.
pub struct RawViolation<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RawViolation<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            fields: value.as_object(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|f| f.get(key))
    }

    fn first_string(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .filter_map(scalar_to_string)
            .find(|s| !s.trim().is_empty())
    }

    pub fn rule(&self) -> String {
        self.first_string(RULE_KEYS)
            .unwrap_or_else(|| UNKNOWN_RULE.to_string())
    }

    pub fn message(&self) -> String {
        self.first_string(MESSAGE_KEYS)
            .unwrap_or_else(|| MISSING_MESSAGE.to_string())
    }

    pub fn severity(&self) -> Option<&'a Value> {
        self.get("severity")
    }

    pub fn location(&self) -> Location {
        let path = PATH_KEYS
            .iter()
            .filter_map(|k| self.get(k))
            .find_map(path_to_string)
            .unwrap_or_default();

        let range_start = self.get("range").and_then(|r| r.get("start"));
        let line = self
            .get("line")
            .and_then(as_position)
            .or_else(|| zero_based(range_start.and_then(|s| s.get("line"))));
        let column = self
            .get("column")
            .and_then(as_position)
            .or_else(|| zero_based(range_start.and_then(|s| s.get("character"))));

        Location::new(path).with_position(line, column)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Paths arrive either as a pointer string or as an array of segments.
fn path_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Array(segments) => Some(
            segments
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join("."),
        ),
        other => scalar_to_string(other),
    }
}

/// A 1-based position given directly; zero and negatives are dropped.
fn as_position(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

fn zero_based(value: Option<&Value>) -> Option<u32> {
    let n = value?.as_u64()?;
    u32::try_from(n).ok()?.checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_rule_name_then_rule() {
        let v = json!({"ruleName": "info-contact", "rule": "ignored"});
        assert_eq!(RawViolation::new(&v).rule(), "info-contact");
        let v = json!({"rule": "oas3-schema"});
        assert_eq!(RawViolation::new(&v).rule(), "oas3-schema");
        let v = json!({"code": 17});
        assert_eq!(RawViolation::new(&v).rule(), "17");
    }

    #[test]
    fn blank_fields_fall_through_to_defaults() {
        let v = json!({"ruleName": "  ", "message": ""});
        let raw = RawViolation::new(&v);
        assert_eq!(raw.rule(), UNKNOWN_RULE);
        assert_eq!(raw.message(), MISSING_MESSAGE);
    }

    #[test]
    fn description_is_message_fallback() {
        let v = json!({"description": "Operation must have tags"});
        assert_eq!(RawViolation::new(&v).message(), "Operation must have tags");
    }

    #[test]
    fn path_array_is_joined() {
        let v = json!({"path": ["paths", "/pets", "get", 0]});
        assert_eq!(RawViolation::new(&v).location().path, "paths./pets.get.0");
    }

    #[test]
    fn pointer_wins_over_path() {
        let v = json!({"pointer": "#/info", "path": ["info"]});
        assert_eq!(RawViolation::new(&v).location().path, "#/info");
    }

    #[test]
    fn range_positions_are_converted_to_one_based() {
        let v = json!({"range": {"start": {"line": 0, "character": 4}}});
        let loc = RawViolation::new(&v).location();
        assert_eq!(loc.line, Some(1));
        assert_eq!(loc.column, Some(5));
    }

    #[test]
    fn explicit_line_wins_over_range() {
        let v = json!({"line": "12", "range": {"start": {"line": 3}}});
        assert_eq!(RawViolation::new(&v).location().line, Some(12));
        let v = json!({"line": 0});
        assert_eq!(RawViolation::new(&v).location().line, None);
    }

    #[test]
    fn non_object_record_is_fully_defaulted() {
        let v = json!("garbage");
        let raw = RawViolation::new(&v);
        assert_eq!(raw.rule(), UNKNOWN_RULE);
        assert_eq!(raw.message(), MISSING_MESSAGE);
        assert!(raw.severity().is_none());
        assert_eq!(raw.location(), Location::new(""));
    }
}
