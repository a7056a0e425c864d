//! Deterministic brand-signal extraction: fetch a page, scan its markup and
//! stylesheets for candidate colors/fonts, and locate a logo.
//!
//! Everything in this crate runs without the LLM. The output is the
//! deterministic floor that the merge step falls back to whenever the LLM's
//! proposals fail validation.

pub mod colors;
pub mod fetch;
pub mod fonts;
pub mod logo;

use std::collections::HashSet;

use scraper::Html;
use tracing::{info, instrument};
use url::Url;

use brandlens_shared::{FetchConfig, PageSummary, Result};

pub use colors::{MAX_COLORS, extract_colors, normalize_hex};
pub use fetch::{FetchedDocument, build_client, fetch_page, fetch_stylesheets, stylesheet_links};
pub use fonts::{MAX_FONTS, extract_fonts};
pub use logo::{extract_page_summary, find_logo};

/// Cap on candidate colors after merging stylesheet and inline-attribute sources.
pub const MERGED_COLOR_CAP: usize = 12;

// ---------------------------------------------------------------------------
// ExtractedSignals
// ---------------------------------------------------------------------------

/// The deterministic candidate set for one page.
#[derive(Debug, Clone)]
pub struct ExtractedSignals {
    /// Final URL after redirects.
    pub base_url: Url,
    /// Ordered candidate colors (lowercase 6-digit hex), capped at 12.
    pub colors: Vec<String>,
    /// Ordered candidate fonts, capped at 15.
    pub fonts: Vec<String>,
    /// Best-guess logo URL, if any rule matched.
    pub logo_url: Option<Url>,
    /// Title/description/body excerpt for LLM context.
    pub summary: PageSummary,
}

/// Run the full deterministic extraction pass for one URL.
///
/// Fetches the page (fatal on failure), collects inline `<style>` blocks and
/// up to `config.max_stylesheets` linked stylesheets (failures swallowed),
/// then scans everything — including `style=` attributes — for candidates.
#[instrument(skip_all, fields(url = %url))]
pub async fn extract_signals(
    client: &reqwest::Client,
    url: &Url,
    config: &FetchConfig,
) -> Result<ExtractedSignals> {
    let page = fetch_page(client, url).await?;
    let base_url = page.final_url.clone();

    // Synchronous DOM pass; the parsed document never crosses an await point.
    let (summary, logo_url, style_blocks, style_attrs, links) = {
        let doc = Html::parse_document(&page.html);
        (
            extract_page_summary(&doc),
            find_logo(&doc, &base_url),
            fetch::inline_style_blocks(&doc),
            fetch::inline_style_attrs(&doc),
            stylesheet_links(&doc, &base_url, config.max_stylesheets),
        )
    };

    let stylesheet_count = links.len();
    let sheets = fetch_stylesheets(client, links, config).await;

    let mut css_parts = style_blocks;
    css_parts.extend(sheets);
    let full_css = css_parts.join("\n");

    let mut candidate_colors = extract_colors(&full_css);
    let mut candidate_fonts = extract_fonts(&full_css);
    for attr in &style_attrs {
        candidate_colors.extend(extract_colors(attr));
        candidate_fonts.extend(extract_fonts(attr));
    }

    let mut colors = dedup_preserving(candidate_colors);
    colors.truncate(MERGED_COLOR_CAP);
    let mut fonts = dedup_case_insensitive(candidate_fonts);
    fonts.truncate(MAX_FONTS);

    info!(
        colors = colors.len(),
        fonts = fonts.len(),
        stylesheets = stylesheet_count,
        logo = logo_url.is_some(),
        "extraction complete"
    );

    Ok(ExtractedSignals {
        base_url,
        colors,
        fonts,
        logo_url,
        summary,
    })
}

/// Deduplicate keeping first-seen order.
fn dedup_preserving(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|c| seen.insert(c.clone())).collect()
}

/// Deduplicate case-insensitively, keeping first-seen order and casing.
fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|f| seen.insert(f.to_lowercase()))
        .collect()
}
