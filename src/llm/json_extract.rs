//! JSON recovery for LLM output.
//!
//! Hosted models wrap JSON in prose, code fences, or an extra layer of
//! string encoding. [`extract_json_object`] tries the known failure modes
//! in order of likelihood and returns the first object that parses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.+?)\s*```").expect("valid regex"));

/// Attempts to recover a JSON object from LLM output.
///
/// Recovery passes, in order:
/// 1. unwrap one layer of JSON string encoding (double-encoded content);
/// 2. a ```json fenced block;
/// 3. the outermost brace-balanced slice;
/// 4. a direct parse of the whole content.
///
/// Only objects are accepted; arrays and scalars return `None`.
pub fn extract_json_object(content: &str) -> Option<Value> {
    let mut text = content.trim().to_string();

    // Double-encoded: the whole content is a JSON string holding JSON text.
    if (text.starts_with('"') && text.ends_with('"'))
        || text.contains("\\\"")
        || text.contains("\\n")
    {
        if let Ok(Value::String(unwrapped)) = serde_json::from_str::<Value>(&text) {
            text = unwrapped.trim().to_string();
        }
    }

    if let Some(captures) = FENCED_JSON.captures(&text) {
        if let Some(object) = parse_object(captures.get(1)?.as_str()) {
            return Some(object);
        }
    }

    if let Some(slice) = outermost_braces(&text) {
        if let Some(object) = parse_object(slice) {
            return Some(object);
        }
    }

    parse_object(&text)
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Finds the outermost brace-balanced `{...}` slice by depth counting.
fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
