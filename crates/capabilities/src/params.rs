//! Parameter helpers shared by the capabilities.

use serde_json::{Map, Value, json};

static NULL: Value = Value::Null;

/// A parameter by name, or null when absent.
pub fn field<'a>(parameters: &'a Map<String, Value>, key: &str) -> &'a Value {
    parameters.get(key).unwrap_or(&NULL)
}

/// Render a parameter value as query-string text. Lists are comma-joined,
/// null is blank.
pub fn param_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(param_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Schema of a `requirements_breakdown` object with exactly `keys`, all
/// required.
///
/// `lenient` fields also accept lists and null, which is how the analyzer
/// tends to express "several" and "none".
pub fn breakdown(keys: &[&str], lenient: bool) -> Value {
    let field = if lenient {
        json!({
            "type": ["string", "number", "array", "null"],
            "items": { "type": ["string", "number"] }
        })
    } else {
        json!({ "type": ["string", "number"] })
    };

    let properties: Map<String, Value> = keys
        .iter()
        .map(|k| (k.to_string(), field.clone()))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": keys,
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rendering() {
        assert_eq!(param_text(&json!(" soup ")), "soup");
        assert_eq!(param_text(&json!(["a", "", "b"])), "a,b");
        assert_eq!(param_text(&json!(2.5)), "2.5");
        assert_eq!(param_text(&json!(null)), "");
        assert_eq!(param_text(&json!(715415)), "715415");
    }

    #[test]
    fn breakdown_requires_every_key() {
        let schema = breakdown(&["a", "b"], false);
        assert_eq!(schema["required"], json!(["a", "b"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert!(schema["properties"]["b"].is_object());
    }
}
