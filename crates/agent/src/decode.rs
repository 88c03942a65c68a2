//! Strict decoding of the model's reply into an [`ActionRequest`].
//!
//! The decoder is pure: the same reply always yields the same result, and
//! nothing is coerced. A reply that is not a JSON object with a non-empty
//! string `action` is a [`SelectionError::Parse`].

use ladle_core::capability::ActionRequest;
use ladle_core::error::SelectionError;
use serde_json::{Map, Value};

/// Decode a reply of the form `{"action": "...", "parameters": {...}}`.
///
/// Surrounding whitespace and a single Markdown code fence are tolerated.
/// `parameters` may be absent or `null`, which both mean "no parameters".
/// Extra top-level keys are ignored.
pub fn decode_action(reply: &str) -> Result<ActionRequest, SelectionError> {
    let body = strip_fence(reply.trim());

    let value: Value = serde_json::from_str(body).map_err(|e| parse_error(reply, e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(parse_error(reply, "reply is not a JSON object"));
    };

    let name = match object.remove("action") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        Some(Value::String(_)) => return Err(parse_error(reply, "`action` is empty")),
        Some(_) => return Err(parse_error(reply, "`action` is not a string")),
        None => return Err(parse_error(reply, "missing field `action`")),
    };

    let parameters = match object.remove("parameters") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(parse_error(reply, "`parameters` is not an object")),
    };

    Ok(ActionRequest::new(name, parameters))
}

/// Remove one ```` ``` ```` fence (with an optional language tag) around
/// the body, if present.
fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim_start().starts_with(['{', '[']) => {
            inner[newline + 1..].trim()
        }
        _ => inner.trim(),
    }
}

fn parse_error(reply: &str, reason: impl Into<String>) -> SelectionError {
    SelectionError::Parse {
        reason: reason.into(),
        reply: reply.to_string(),
    }
}
