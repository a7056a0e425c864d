//! Response normalization: recover a structured mapping from an LLM's
//! free-form textual reply.
//!
//! Handles markdown code fences, conversational prose around the JSON,
//! trailing commas, and camelCase key drift. Parse failure is never a hard
//! failure path — callers get an empty mapping and must supply a safe default.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches a fenced code block (optionally tagged `json`) containing an object.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("fence regex")
});

/// Matches the outermost `{...}` span (greedy, first `{` to last `}`).
static BRACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[\s\S]*\}").expect("brace regex")
});

/// Matches a trailing comma immediately before a closing `}` or `]`.
static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s*([}\]])").expect("trailing comma regex")
});

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Recover a JSON object from raw reply text.
///
/// Returns an empty mapping when no object can be recovered — including when
/// the reply parses to a non-object value like a bare list.
pub fn normalize_reply(raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }

    let candidate = match FENCE_RE.captures(raw) {
        Some(caps) => caps[1].trim().to_string(),
        None => raw.trim().to_string(),
    };

    // Narrow to the {...} span, discarding prose before/after the JSON
    let candidate = match BRACE_RE.find(&candidate) {
        Some(m) => m.as_str().to_string(),
        None => candidate,
    };

    let cleaned = TRAILING_COMMA_RE.replace_all(&candidate, "$1");

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value @ Value::Object(_)) => match normalize_keys(value) {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        Ok(other) => {
            debug!(kind = json_kind(&other), "LLM reply parsed to a non-object value");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "LLM reply JSON parse failed");
            Map::new()
        }
    }
}

/// Recursively rewrite mapping keys from camelCase to snake_case, through
/// nested objects and arrays.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), normalize_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        scalar => scalar,
    }
}

/// `primaryColors` → `primary_colors`; spaces also become underscores.
fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
