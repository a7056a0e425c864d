//! Candidate brand-color extraction from raw CSS and HTML-attribute text.
//!
//! Four pattern families are scanned in precedence order: literal hex colors,
//! `rgb()`/`rgba()` calls, and CSS custom properties declaring either. Results
//! are normalized to lowercase 6-digit hex, deduplicated preserving first-seen
//! order, and capped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use brandlens_shared::non_empty_or;

/// Maximum colors returned by a single `extract_colors` call.
pub const MAX_COLORS: usize = 16;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches 3- or 6-digit hex color literals.
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[0-9a-fA-F]{3}){1,2}\b").expect("hex regex")
});

/// Matches `rgb(r, g, b)` / `rgba(r, g, b, a)` functional notation.
static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*[\d.]+\s*)?\)")
        .expect("rgb regex")
});

/// Matches CSS custom-property declarations whose value is a hex literal.
static CSS_VAR_HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--[a-zA-Z0-9-]+\s*:\s*#(?:[0-9a-fA-F]{3}){1,2}\b").expect("css var hex regex")
});

/// Matches CSS custom-property declarations whose value is an rgb()/rgba() call.
static CSS_VAR_RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)--[a-zA-Z0-9-]+\s*:\s*rgba?\s*\([^)]+\)").expect("css var rgb regex")
});

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a hex literal to lowercase 6-digit form (`#abc` → `#aabbcc`).
/// Idempotent on already-6-digit input.
pub fn normalize_hex(color: &str) -> String {
    let c = color.trim();
    let lower = c.to_ascii_lowercase();
    let digits: Vec<char> = lower.chars().skip(1).collect();
    if digits.len() == 3 {
        let mut out = String::with_capacity(7);
        out.push('#');
        for d in digits {
            out.push(d);
            out.push(d);
        }
        out
    } else {
        lower
    }
}

/// Convert rgb components to lowercase hex. Alpha is ignored by the caller.
fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Canonical near-white/near-black values excluded from CSS-derived
/// candidates. Off-white values like `#fefefe` deliberately pass through.
fn is_monochrome(hex6: &str) -> bool {
    hex6 == "#ffffff" || hex6 == "#000000"
}

fn parse_rgb_captures(caps: &regex::Captures<'_>) -> Option<(u8, u8, u8)> {
    let r = caps[1].parse::<u8>().ok()?;
    let g = caps[2].parse::<u8>().ok()?;
    let b = caps[3].parse::<u8>().ok()?;
    Some((r, g, b))
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Scan raw CSS/attribute text for candidate brand colors.
///
/// Returns an ordered, deduplicated list of lowercase 6-digit hex strings,
/// capped at [`MAX_COLORS`]. If monochrome filtering would yield an empty set,
/// the unfiltered hex literals are admitted instead so an all-monochrome site
/// still produces candidates.
pub fn extract_colors(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut found: Vec<String> = Vec::new();

    let mut add = |hex: String, seen: &mut HashSet<String>, found: &mut Vec<String>| {
        if seen.insert(hex.clone()) {
            found.push(hex);
        }
    };

    // Family 1: hex literals
    for m in HEX_RE.find_iter(text) {
        let norm = normalize_hex(m.as_str());
        if !is_monochrome(&norm) {
            add(norm, &mut seen, &mut found);
        }
    }

    // Family 2: rgb()/rgba() calls
    for caps in RGB_RE.captures_iter(text) {
        if let Some((r, g, b)) = parse_rgb_captures(&caps) {
            let hex = rgb_to_hex(r, g, b);
            if !is_monochrome(&hex) {
                add(hex, &mut seen, &mut found);
            }
        }
    }

    // Family 3: custom properties with hex values
    for m in CSS_VAR_HEX_RE.find_iter(text) {
        if let Some(hex_m) = HEX_RE.find(m.as_str()) {
            let norm = normalize_hex(hex_m.as_str());
            if !is_monochrome(&norm) {
                add(norm, &mut seen, &mut found);
            }
        }
    }

    // Family 4: custom properties with rgb()/rgba() values
    for m in CSS_VAR_RGB_RE.find_iter(text) {
        if let Some(caps) = RGB_RE.captures(m.as_str()) {
            if let Some((r, g, b)) = parse_rgb_captures(&caps) {
                let hex = rgb_to_hex(r, g, b);
                if !is_monochrome(&hex) {
                    add(hex, &mut seen, &mut found);
                }
            }
        }
    }

    // All-monochrome fallback: never silently drop every hex literal
    let mut found = non_empty_or(found, unfiltered_hex_pass(text));
    found.truncate(MAX_COLORS);
    found
}

/// Re-scan family 1 without the monochrome filter.
fn unfiltered_hex_pass(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut found: Vec<String> = Vec::new();
    for m in HEX_RE.find_iter(text) {
        let norm = normalize_hex(m.as_str());
        if seen.insert(norm.clone()) {
            found.push(norm);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_shorthand() {
        assert_eq!(normalize_hex("#abc"), "#aabbcc");
        assert_eq!(normalize_hex("#ABC"), "#aabbcc");
    }

    #[test]
    fn normalize_idempotent_on_six_digit() {
        assert_eq!(normalize_hex("#aabbcc"), "#aabbcc");
        assert_eq!(normalize_hex(&normalize_hex("#abc")), "#aabbcc");
        assert_eq!(normalize_hex("#FF0000"), "#ff0000");
    }

    #[test]
    fn extracts_hex_literals() {
        let css = "a { color: #635BFF; } b { background: #0a2540; }";
        assert_eq!(extract_colors(css), vec!["#635bff", "#0a2540"]);
    }

    #[test]
    fn extracts_rgb_notation() {
        let css = "color: rgb(99, 91, 255);";
        assert!(extract_colors(css).contains(&"#635bff".to_string()));
    }

    #[test]
    fn rgba_alpha_ignored() {
        let css = "color: rgba(10, 37, 64, 0.8);";
        assert_eq!(extract_colors(css), vec!["#0a2540"]);
    }

    #[test]
    fn extracts_custom_property_values() {
        let css = ":root { --brand: #00ff00; --accent: rgb(255, 100, 0); }";
        let colors = extract_colors(css);
        assert!(colors.contains(&"#00ff00".to_string()));
        assert!(colors.contains(&"#ff6400".to_string()));
    }

    #[test]
    fn filters_monochrome() {
        let css = "a { color: #ffffff; } b { color: #635bff; } c { color: #000; }";
        assert_eq!(extract_colors(css), vec!["#635bff"]);
    }

    #[test]
    fn monochrome_custom_properties_filtered_too() {
        let css = ":root { --bg: #fff; --fg: #000000; --brand: #112233; }";
        assert_eq!(extract_colors(css), vec!["#112233"]);
    }

    #[test]
    fn all_monochrome_falls_back_unfiltered() {
        let css = "a { color: #ffffff; background: #000000; }";
        let colors = extract_colors(css);
        assert_eq!(colors, vec!["#ffffff", "#000000"]);
    }

    #[test]
    fn monochrome_rgb_filtered() {
        let css = "a { color: rgb(255,255,255); } b { color: rgb(0, 0, 0); } c { color: rgb(1,2,3); }";
        assert_eq!(extract_colors(css), vec!["#010203"]);
    }

    #[test]
    fn off_white_passes_through() {
        // Heuristic threshold gap preserved: only the canonical values filter
        let css = "a { color: #fefefe; }";
        assert_eq!(extract_colors(css), vec!["#fefefe"]);
    }

    #[test]
    fn duplicates_across_families_collapse() {
        let css = "a { color: #635bff; } :root { --brand: #635BFF; } b { color: rgb(99,91,255); }";
        assert_eq!(extract_colors(css), vec!["#635bff"]);
    }

    #[test]
    fn capped_at_sixteen() {
        let css: String = (0..30)
            .map(|i| format!("a {{ color: #{i:02x}11{i:02x}; }}"))
            .collect();
        assert_eq!(extract_colors(&css).len(), MAX_COLORS);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract_colors("").is_empty());
        assert!(extract_colors("body { margin: 0; }").is_empty());
    }
}
