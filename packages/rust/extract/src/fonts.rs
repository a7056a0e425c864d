//! Candidate font-family extraction from raw CSS text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum fonts returned by a single `extract_fonts` call.
pub const MAX_FONTS: usize = 15;

/// Matches `font-family: <value>` declarations up to the next `;` or `}`.
static FONT_FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)font-family\s*:\s*([^;}]+)").expect("font-family regex")
});

/// Generic CSS font families, platform default names, and global keywords —
/// never brand signals.
const EXCLUDED_FAMILIES: &[&str] = &[
    "inherit",
    "initial",
    "unset",
    "sans-serif",
    "serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "-apple-system",
    "blinkmacsystemfont",
];

/// Scan CSS text for candidate brand fonts.
///
/// Takes the first comma-separated token of each `font-family` declaration,
/// strips quotes and whitespace, and drops generic families and keywords.
/// First occurrence of a name (case-insensitive) wins and keeps its original
/// casing; the result is capped at [`MAX_FONTS`].
pub fn extract_fonts(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for caps in FONT_FAMILY_RE.captures_iter(text) {
        let value = caps[1].trim().trim_matches(&['\'', '"'][..]);
        let first = match value.split(',').next() {
            Some(token) => token.trim().trim_matches(&['\'', '"'][..]).trim(),
            None => continue,
        };

        if first.is_empty() {
            continue;
        }

        let lower = first.to_lowercase();
        if EXCLUDED_FAMILIES.contains(&lower.as_str()) {
            continue;
        }

        if seen.insert(lower) {
            found.push(first.to_string());
        }
    }

    found.truncate(MAX_FONTS);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_token_and_drops_generic_fallback() {
        let css = r#"body { font-family: "Helvetica Neue", sans-serif; }"#;
        assert_eq!(extract_fonts(css), vec!["Helvetica Neue"]);
    }

    #[test]
    fn strips_single_quotes() {
        let css = "h1 { font-family: 'Playfair Display', serif; }";
        assert_eq!(extract_fonts(css), vec!["Playfair Display"]);
    }

    #[test]
    fn generic_families_excluded() {
        let css = "a { font-family: sans-serif; } b { font-family: monospace; } c { font-family: system-ui; }";
        assert!(extract_fonts(css).is_empty());
    }

    #[test]
    fn global_keywords_excluded() {
        let css = "a { font-family: inherit; } b { font-family: initial; } c { font-family: unset; }";
        assert!(extract_fonts(css).is_empty());
    }

    #[test]
    fn case_insensitive_dedup_keeps_first_casing() {
        let css = "a { font-family: Inter; } b { font-family: INTER; } c { font-family: inter; }";
        assert_eq!(extract_fonts(css), vec!["Inter"]);
    }

    #[test]
    fn insertion_order_preserved() {
        let css = "a { font-family: Sohne; } b { font-family: Inter; } c { font-family: Sohne; }";
        assert_eq!(extract_fonts(css), vec!["Sohne", "Inter"]);
    }

    #[test]
    fn stops_at_declaration_boundary() {
        let css = "a { font-family: Roboto } b { color: red; }";
        assert_eq!(extract_fonts(css), vec!["Roboto"]);
    }

    #[test]
    fn capped_at_fifteen() {
        let css: String = (0..20).map(|i| format!("a {{ font-family: Font{i}; }}")).collect();
        assert_eq!(extract_fonts(&css).len(), MAX_FONTS);
    }
}
