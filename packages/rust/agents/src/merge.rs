//! Brand-profile merging: reconcile LLM-proposed values against the
//! deterministic candidate set under validity rules.
//!
//! Deterministic extraction is the floor; LLM output is an enhancement
//! applied only when it passes validation. The merged profile never surfaces
//! a malformed or hallucinated hex value.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use brandlens_shared::{BrandProfile, valid_or};

/// Cap on primary/secondary color lists.
const COLOR_CAP: usize = 5;

/// How many extracted colors to promote when the LLM proposal is unusable.
const COLOR_FALLBACK_COUNT: usize = 3;

/// Cap on the fonts list.
const FONT_CAP: usize = 10;

/// Matches a complete 3- or 6-digit hex color string.
static HEX_FULL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex validation regex")
});

/// Whether a string is a well-formed hex color.
pub fn is_valid_hex(s: &str) -> bool {
    HEX_FULL_RE.is_match(s)
}

/// Pull a list of trimmed strings out of an LLM output field.
/// Non-string entries are coerced when scalar and skipped otherwise.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

fn string_field(llm: &Map<String, Value>, key: &str) -> Option<String> {
    llm.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Merge LLM analysis output with the deterministic extraction results.
///
/// Rules, in order:
/// - `primary_colors`: hex-valid LLM entries capped at 5, else the first 3
///   extracted colors; an empty list is acceptable.
/// - `secondary_colors`: same rule, pool = extracted minus primary; entries
///   equal to any primary are excluded even when LLM-proposed.
/// - `fonts`: LLM entries coerced to text capped at 10, else extracted fonts.
/// - `logo_url`: only ever the deterministic candidate.
/// - `url`: always the source URL.
pub fn merge_profile(
    llm: &Map<String, Value>,
    extracted_colors: &[String],
    extracted_fonts: &[String],
    logo: Option<&Url>,
    source_url: &Url,
) -> BrandProfile {
    let primary_colors = valid_or(
        string_list(llm.get("primary_colors")),
        |c: &String| is_valid_hex(c),
        extracted_colors
            .iter()
            .take(COLOR_FALLBACK_COUNT)
            .cloned()
            .collect(),
        COLOR_CAP,
    );

    let primary_set: HashSet<&str> = primary_colors.iter().map(String::as_str).collect();
    let secondary_pool: Vec<String> = extracted_colors
        .iter()
        .filter(|c| !primary_set.contains(c.as_str()))
        .take(COLOR_FALLBACK_COUNT)
        .cloned()
        .collect();

    let secondary_colors = valid_or(
        string_list(llm.get("secondary_colors")),
        |c: &String| is_valid_hex(c) && !primary_set.contains(c.as_str()),
        secondary_pool,
        COLOR_CAP,
    );

    let fonts = valid_or(
        string_list(llm.get("fonts")),
        |_| true,
        extracted_fonts.to_vec(),
        FONT_CAP,
    );

    BrandProfile {
        url: source_url.to_string(),
        primary_colors,
        secondary_colors,
        fonts,
        style: string_field(llm, "style").unwrap_or_default(),
        mood: string_list(llm.get("mood")),
        logo_url: logo.map(|u| u.to_string()),
        logo_description: string_field(llm, "logo_description"),
    }
}
