//! Document heuristics: logo-URL discovery and page summary extraction.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use brandlens_shared::PageSummary;

/// Character cap for the meta description in [`PageSummary`].
const META_DESCRIPTION_CAP: usize = 500;

/// Character cap for the body excerpt in [`PageSummary`].
const BODY_EXCERPT_CAP: usize = 3000;

// ---------------------------------------------------------------------------
// Logo discovery
// ---------------------------------------------------------------------------

/// Locate a best-guess logo image URL in the document.
///
/// Rules tried in order, first applicable wins:
/// 1. an `og:image` meta tag with absolute or protocol-relative content,
/// 2. the first `<img>` whose class/id/alt contains "logo",
/// 3. the first non-`data:` `<img>` inside a header/nav landmark (or body).
///
/// Never returns a `data:` URI; `None` means "no logo found".
pub fn find_logo(doc: &Html, base_url: &Url) -> Option<Url> {
    let meta_sel = Selector::parse("meta[property]").expect("meta selector");
    for meta in doc.select(&meta_sel) {
        let property = meta.value().attr("property").unwrap_or("");
        if !property.to_lowercase().contains("og:image") {
            continue;
        }
        let content = meta.value().attr("content").unwrap_or("").trim();
        // Schemeless-relative content is skipped; protocol-relative resolves
        if content.starts_with("http") || content.starts_with("//") {
            if let Some(resolved) = resolve_image_url(base_url, content) {
                return Some(resolved);
            }
        }
    }

    let img_sel = Selector::parse("img[src]").expect("img selector");
    for img in doc.select(&img_sel) {
        let src = img.value().attr("src").unwrap_or("");
        if src.is_empty() || src.starts_with("data:") {
            continue;
        }
        let attrs = format!(
            "{} {} {}",
            img.value().attr("class").unwrap_or(""),
            img.value().attr("id").unwrap_or(""),
            img.value().attr("alt").unwrap_or(""),
        )
        .to_lowercase();
        if attrs.contains("logo") {
            if let Some(resolved) = resolve_image_url(base_url, src) {
                return Some(resolved);
            }
        }
    }

    let landmark_sel = Selector::parse("header, nav").expect("landmark selector");
    let body_sel = Selector::parse("body").expect("body selector");
    let landmark: Option<ElementRef<'_>> = doc
        .select(&landmark_sel)
        .next()
        .or_else(|| doc.select(&body_sel).next());

    if let Some(root) = landmark {
        for img in root.select(&img_sel) {
            let src = img.value().attr("src").unwrap_or("");
            if !src.is_empty() && !src.starts_with("data:") {
                if let Some(resolved) = resolve_image_url(base_url, src) {
                    return Some(resolved);
                }
            }
        }
    }

    None
}

/// Resolve an image reference against the base URL.
/// Empty and `data:` references resolve to nothing.
fn resolve_image_url(base: &Url, reference: &str) -> Option<Url> {
    if reference.is_empty() || reference.starts_with("data:") {
        return None;
    }
    base.join(reference).ok()
}

// ---------------------------------------------------------------------------
// Page summary
// ---------------------------------------------------------------------------

/// Extract title, meta description, and a body text excerpt for LLM context.
pub fn extract_page_summary(doc: &Html) -> PageSummary {
    let title_sel = Selector::parse("title").expect("title selector");
    let title = doc
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let desc_sel = Selector::parse(r#"meta[name="description"]"#).expect("description selector");
    let meta_description = doc
        .select(&desc_sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| truncate_chars(c.trim(), META_DESCRIPTION_CAP))
        .filter(|c| !c.is_empty());

    let body_sel = Selector::parse("body").expect("body selector");
    let body_excerpt = doc
        .select(&body_sel)
        .next()
        .map(|body| {
            let joined = body
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            truncate_chars(&joined, BODY_EXCERPT_CAP)
        })
        .unwrap_or_default();

    PageSummary {
        title,
        meta_description,
        body_excerpt,
    }
}

/// Truncate on a character boundary (not bytes).
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
