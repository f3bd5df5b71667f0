//! # Schema Violations
//!
//! Runs a compiled validator over a taxonomy document and turns every
//! violation (not only the first) into a [`Violation`] ready for reporting.
//!
//! ## Message Normalisation
//!
//! - `minItems` failures are reported as `Value must have at least <N> items`
//!   instead of the engine's message, which embeds the whole offending array.
//! - Every other message is cut to its last 200 characters. Nested-schema
//!   errors put the most specific part at the end, so the tail is kept.
//!
//! ## Paths
//!
//! The engine locates violations with JSON Pointers (`/seed_examples/0`).
//! Reports use the dotted path syntax understood by the line-lookup tool
//! (`.seed_examples[0]`), with `.` for the document root.

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;

/// Longest message, in characters, propagated from the schema engine.
pub const MAX_MESSAGE_CHARS: usize = 200;

/// One schema violation, normalised for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer within the schema to the failing keyword.
    pub schema_path: String,
    /// Dotted path to the violating value, `.` for the root.
    pub yaml_path: String,
    /// Message to report.
    pub message: String,
}

/// Validate `instance` and collect every violation in engine order.
pub fn collect_violations(validator: &Validator, instance: &Value) -> Vec<Violation> {
    validator
        .iter_errors(instance)
        .map(|e| {
            let instance_path = e.instance_path.to_string();
            let message = match &e.kind {
                ValidationErrorKind::MinItems { limit } => min_items_message(*limit),
                _ => tail_chars(&e.to_string(), MAX_MESSAGE_CHARS).to_string(),
            };
            Violation {
                yaml_path: pointer_to_yaml_path(&instance_path, instance),
                schema_path: e.schema_path.to_string(),
                instance_path,
                message,
            }
        })
        .collect()
}

/// The fixed message for a `minItems` failure.
pub fn min_items_message(limit: u64) -> String {
    format!("Value must have at least {limit} items")
}

/// The last `max` characters of `message`.
pub fn tail_chars(message: &str, max: usize) -> &str {
    if max == 0 {
        return "";
    }
    match message.char_indices().rev().nth(max - 1) {
        Some((start, _)) => &message[start..],
        None => message,
    }
}

/// Convert a JSON Pointer into the dotted path syntax.
///
/// `instance` disambiguates array indices from numeric object keys: a
/// segment is rendered as `[n]` only when the value it indexes is an array.
/// Keys that are not plain identifiers are quoted (`."two words"`).
pub fn pointer_to_yaml_path(pointer: &str, instance: &Value) -> String {
    let mut path = String::new();
    let mut current = Some(instance);

    for raw in pointer.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Value::Array(items)) if segment.parse::<usize>().is_ok() => {
                path.push('[');
                path.push_str(&segment);
                path.push(']');
                current = segment.parse::<usize>().ok().and_then(|i| items.get(i));
            }
            other => {
                path.push('.');
                if is_plain_key(&segment) {
                    path.push_str(&segment);
                } else {
                    path.push('"');
                    path.push_str(&segment.replace('"', "\\\""));
                    path.push('"');
                }
                current = other.and_then(|v| v.get(segment.as_str()));
            }
        }
    }

    if path.is_empty() {
        path.push('.');
    }
    path
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(schema: &Value) -> Validator {
        jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(schema)
            .unwrap()
    }

    #[test]
    fn test_min_items_message_is_normalised() {
        let validator = compile(&json!({
            "type": "object",
            "properties": {"seed_examples": {"type": "array", "minItems": 5}}
        }));
        let doc = json!({"seed_examples": [1, 2, 3]});
        let violations = collect_violations(&validator, &doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Value must have at least 5 items");
        assert_eq!(violations[0].yaml_path, ".seed_examples");
        assert_eq!(violations[0].instance_path, "/seed_examples");
    }

    #[test]
    fn test_all_violations_are_collected() {
        let validator = compile(&json!({
            "type": "object",
            "required": ["version", "created_by"],
            "properties": {"task_description": {"type": "string"}}
        }));
        let violations = collect_violations(&validator, &json!({"task_description": 3}));
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().any(|v| v.message.contains("\"version\" is a required property")));
        assert!(violations.iter().any(|v| v.message.contains("\"created_by\" is a required property")));
        let root: Vec<_> = violations.iter().filter(|v| v.yaml_path == ".").collect();
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_long_messages_keep_their_tail() {
        let validator = compile(&json!({"type": "object", "properties": {"a": {"type": "integer"}}}));
        let long = "x".repeat(500);
        let violations = collect_violations(&validator, &json!({"a": long}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message.chars().count(), MAX_MESSAGE_CHARS);
        assert!(violations[0].message.ends_with("is not of type \"integer\""));
    }

    #[test]
    fn test_tail_chars_respects_char_boundaries() {
        assert_eq!(tail_chars("héllo wörld", 5), "wörld");
        assert_eq!(tail_chars("short", 200), "short");
        assert_eq!(tail_chars("abc", 0), "");
    }

    #[test]
    fn test_pointer_to_yaml_path() {
        let doc = json!({
            "seed_examples": [{"question": "q"}, {"answer": "a"}],
            "2024": {"0": true},
            "two words": 1
        });
        assert_eq!(pointer_to_yaml_path("", &doc), ".");
        assert_eq!(pointer_to_yaml_path("/seed_examples", &doc), ".seed_examples");
        assert_eq!(
            pointer_to_yaml_path("/seed_examples/1/answer", &doc),
            ".seed_examples[1].answer"
        );
        assert_eq!(pointer_to_yaml_path("/2024/0", &doc), ".2024.0");
        assert_eq!(pointer_to_yaml_path("/two words", &doc), ".\"two words\"");
        assert_eq!(pointer_to_yaml_path("/a~1b", &json!({})), ".\"a/b\"");
    }
}
