//! Display formatting for logged values
//!
//! Messages are carried as [`serde_json::Value`]:
//!
//! - scalars render as their canonical text (`null` for null, strings verbatim)
//! - sequences render inline as `[a, b, c]`
//! - mappings render as a pretty-printed block with 2-space indentation
//!
//! Small flat mappings (at most [`FAST_PATH_MAX_ENTRIES`] entries, no nested
//! containers) are built by hand instead of going through the encoder. The
//! output is byte-identical to the encoder's.
//!
//! Past the depth cap only the over-deep containers degrade; a mapping keeps
//! every field that is still within the cap.

use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Default nesting depth past which values degrade to a placeholder
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest mapping eligible for the hand-built fast path
pub const FAST_PATH_MAX_ENTRIES: usize = 3;

const MAPPING_PLACEHOLDER: &str = "{...}";
const SEQUENCE_PLACEHOLDER: &str = "[...]";

/// Renders structured values into display text
#[derive(Debug, Clone, Copy)]
pub struct ValueFormatter {
    max_depth: usize,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueFormatter {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Cap the nesting depth rendered before falling back to a placeholder
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Render a value for display
    ///
    /// Never fails; values nested past the depth cap render as `{...}` or
    /// `[...]`.
    pub fn format(&self, value: &Value) -> String {
        self.format_at(value, 0)
    }

    fn format_at(&self, value: &Value, depth: usize) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) if depth >= self.max_depth => placeholder(value),
            Value::Array(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| self.format_at(item, depth + 1))
                    .collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Object(map) => self.format_mapping(map, depth),
        }
    }

    fn format_mapping(&self, map: &Map<String, Value>, depth: usize) -> String {
        if fits_fast_path(map) {
            return format_flat_mapping(map);
        }

        let budget = self.max_depth.saturating_sub(depth);
        if map.values().any(|v| exceeds_depth(v, budget.saturating_sub(1))) {
            let mut out = String::new();
            self.write_mapping(&mut out, map, depth, 0);
            return out;
        }

        serde_json::to_string_pretty(map).unwrap_or_else(|_| MAPPING_PLACEHOLDER.to_string())
    }

    /// Pretty block in the encoder's layout, with containers at the depth
    /// cap written as placeholders
    fn write_mapping(
        &self,
        out: &mut String,
        map: &Map<String, Value>,
        depth: usize,
        indent: usize,
    ) {
        if map.is_empty() {
            out.push_str("{}");
            return;
        }

        out.push_str("{\n");
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n");
            }
            push_indent(out, indent + 1);
            push_quoted(out, key);
            out.push_str(": ");
            self.write_pretty(out, value, depth + 1, indent + 1);
        }
        out.push('\n');
        push_indent(out, indent);
        out.push('}');
    }

    fn write_pretty(&self, out: &mut String, value: &Value, depth: usize, indent: usize) {
        match value {
            Value::Array(_) | Value::Object(_) if depth >= self.max_depth => {
                out.push_str(&placeholder(value));
            }
            Value::Object(map) => self.write_mapping(out, map, depth, indent),
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    push_indent(out, indent + 1);
                    self.write_pretty(out, item, depth + 1, indent + 1);
                }
                out.push('\n');
                push_indent(out, indent);
                out.push(']');
            }
            scalar => push_scalar(out, scalar),
        }
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn placeholder(value: &Value) -> String {
    match value {
        Value::Object(_) => MAPPING_PLACEHOLDER.to_string(),
        Value::Array(_) => SEQUENCE_PLACEHOLDER.to_string(),
        other => other.to_string(),
    }
}

/// Whether `value` nests containers deeper than `budget` levels
///
/// Recursion never goes further than `budget + 1` frames.
fn exceeds_depth(value: &Value, budget: usize) -> bool {
    let mut children: Box<dyn Iterator<Item = &Value>> = match value {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        _ => return false,
    };

    if budget == 0 {
        return true;
    }
    children.any(|child| exceeds_depth(child, budget - 1))
}

fn fits_fast_path(map: &Map<String, Value>) -> bool {
    map.len() <= FAST_PATH_MAX_ENTRIES
        && map
            .values()
            .all(|v| !matches!(v, Value::Array(_) | Value::Object(_)))
}

/// Hand-built pretty block for a flat mapping
///
/// Mirrors `serde_json::to_string_pretty` exactly for mappings whose values
/// are all scalars.
fn format_flat_mapping(map: &Map<String, Value>) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }

    let mut out = String::from("{\n");
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push_str("  ");
        push_quoted(&mut out, key);
        out.push_str(": ");
        push_scalar(&mut out, value);
    }
    out.push_str("\n}");
    out
}

/// Append a scalar the way the encoder writes it
fn push_scalar(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => push_quoted(out, s),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::Array(_) | Value::Object(_) => out.push_str(&placeholder(value)),
    }
}

/// Append `s` as a JSON string literal, escaped the way serde_json does
fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fmt(value: Value) -> String {
        ValueFormatter::new().format(&value)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(fmt(Value::Null), "null");
        assert_eq!(fmt(json!(true)), "true");
        assert_eq!(fmt(json!(42)), "42");
        assert_eq!(fmt(json!(-1.5)), "-1.5");
        assert_eq!(fmt(json!("plain text")), "plain text");
    }

    #[test]
    fn test_sequences_render_inline() {
        assert_eq!(fmt(json!([1, "two", null, [3, 4]])), "[1, two, null, [3, 4]]");
        assert_eq!(fmt(json!([])), "[]");
    }

    #[test]
    fn test_flat_mapping_block() {
        let out = fmt(json!({"user": "ann", "attempt": 2, "ok": false}));
        assert_eq!(
            out,
            "{\n  \"attempt\": 2,\n  \"ok\": false,\n  \"user\": \"ann\"\n}"
        );
    }

    #[test]
    fn test_empty_mapping() {
        assert_eq!(fmt(json!({})), "{}");
    }

    #[test]
    fn test_string_values_are_escaped() {
        let out = fmt(json!({"msg": "say \"hi\"\n\tback\\slash\r"}));
        assert_eq!(out, "{\n  \"msg\": \"say \\\"hi\\\"\\n\\tback\\\\slash\\r\"\n}");
    }

    #[test]
    fn test_nested_mapping_uses_general_path() {
        let value = json!({"a": 1, "b": {"c": [1, 2]}});
        let out = fmt(value.clone());
        assert_eq!(out, serde_json::to_string_pretty(&value).unwrap());
        assert!(out.contains("    \"c\": [\n      1,\n      2\n    ]"));
    }

    #[test]
    fn test_large_flat_mapping_uses_general_path() {
        let value = json!({"a": 1, "b": 2, "c": 3, "d": 4});
        assert_eq!(fmt(value.clone()), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_depth_cap_degrades_to_placeholder() {
        let formatter = ValueFormatter::new().with_max_depth(2);

        let deep_map = json!({"a": {"b": {"c": 1}}});
        assert_eq!(formatter.format(&deep_map), "{\n  \"a\": {\n    \"b\": {...}\n  }\n}");

        let deep_list = json!([[[1]]]);
        assert_eq!(formatter.format(&deep_list), "[[[...]]]");
    }

    #[test]
    fn test_pathologically_deep_value_does_not_overflow() {
        let mut value = json!(0);
        for _ in 0..1_000 {
            value = json!([value]);
        }
        let out = ValueFormatter::new().format(&value);
        assert!(out.contains("[...]"));

        let mapping = json!({"deep": value});
        let out = ValueFormatter::new().format(&mapping);
        assert!(out.starts_with("{\n  \"deep\": [\n    [\n"));
        assert!(out.contains("[...]"));
    }

    #[test]
    fn test_depth_cap_keeps_shallow_fields() {
        let formatter = ValueFormatter::new().with_max_depth(2);
        let value = json!({"a": 1, "b": {"c": {"d": 1}}, "e": 2, "f": [3, [4, [5]]]});

        assert_eq!(
            formatter.format(&value),
            "{\n  \"a\": 1,\n  \"b\": {\n    \"c\": {...}\n  },\n  \"e\": 2,\n  \"f\": [\n    3,\n    [...]\n  ]\n}"
        );
    }

    #[test]
    fn test_truncated_mapping_keeps_encoder_layout() {
        let formatter = ValueFormatter::new().with_max_depth(3);
        let value = json!({"w": [[[[1]]]], "x": [], "y": {}, "z": {"k": ["s", null, 1.5]}});

        let expected = "\
{
  \"w\": [
    [
      [...]
    ]
  ],
  \"x\": [],
  \"y\": {},
  \"z\": {
    \"k\": [
      \"s\",
      null,
      1.5
    ]
  }
}";
        assert_eq!(formatter.format(&value), expected);
    }

    #[test]
    fn test_control_characters_match_encoder() {
        let value = json!({"k": "\u{01}\u{08}\u{0C}\u{1f}\u{7f}"});
        let Value::Object(map) = &value else {
            unreachable!()
        };
        assert_eq!(
            format_flat_mapping(map),
            serde_json::to_string_pretty(map).unwrap()
        );
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<u64>().prop_map(Value::from),
            (-1.0e12f64..1.0e12f64).prop_map(Value::from),
            any::<String>().prop_map(Value::String),
        ]
    }

    proptest! {
        #[test]
        fn prop_fast_path_matches_encoder(
            entries in proptest::collection::vec((any::<String>(), scalar()), 0..=3)
        ) {
            let map: Map<String, Value> = entries.into_iter().collect();
            prop_assert!(fits_fast_path(&map));
            prop_assert_eq!(
                format_flat_mapping(&map),
                serde_json::to_string_pretty(&map).unwrap()
            );
        }
    }
}
