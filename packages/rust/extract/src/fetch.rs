//! Page and stylesheet fetching for the extraction pipeline.
//!
//! The primary page fetch is fatal on any non-success status. Auxiliary
//! stylesheet fetches are bounded, issued concurrently, and individually
//! swallowed on failure — partial stylesheet availability must never abort
//! an extraction request.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use brandlens_shared::{BrandLensError, FetchConfig, Result};

/// User-Agent string for outbound requests.
const USER_AGENT: &str = concat!("BrandLens/", env!("CARGO_PKG_VERSION"));

/// Maximum redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// A fetched page plus the URL it finally resolved to after redirects.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Raw page HTML.
    pub html: String,
    /// Final URL after redirects — the base for all relative resolution.
    pub final_url: Url,
}

/// Build a reqwest client with appropriate settings.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(config.page_timeout_secs))
        .build()
        .map_err(|e| BrandLensError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch the primary page. Non-success status is fatal for the request.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedDocument> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| BrandLensError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BrandLensError::Network(format!("{url}: HTTP {status}")));
    }

    let final_url = response.url().clone();
    let html = response
        .text()
        .await
        .map_err(|e| BrandLensError::Network(format!("{url}: body read failed: {e}")))?;

    Ok(FetchedDocument { html, final_url })
}

/// Collect inline `<style>` block contents from the document.
pub fn inline_style_blocks(doc: &Html) -> Vec<String> {
    let style_sel = Selector::parse("style").expect("style selector");
    doc.select(&style_sel)
        .map(|el| el.text().collect::<String>())
        .filter(|css| !css.trim().is_empty())
        .collect()
}

/// Collect all `style="..."` attribute values from the document.
pub fn inline_style_attrs(doc: &Html) -> Vec<String> {
    let styled_sel = Selector::parse("[style]").expect("styled selector");
    doc.select(&styled_sel)
        .filter_map(|el| el.value().attr("style"))
        .map(str::to_string)
        .collect()
}

/// Resolve the first `max` linked stylesheet URLs from the document.
/// `data:` hrefs and unresolvable references are skipped.
pub fn stylesheet_links(doc: &Html, base_url: &Url, max: usize) -> Vec<Url> {
    let link_sel = Selector::parse("link[rel][href]").expect("link selector");
    doc.select(&link_sel)
        .filter(|el| {
            el.value()
                .attr("rel")
                .is_some_and(|rel| rel.to_lowercase().contains("stylesheet"))
        })
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty() && !href.starts_with("data:"))
        .filter_map(|href| base_url.join(href).ok())
        .take(max)
        .collect()
}

/// Fetch stylesheets concurrently, each capped at `config.stylesheet_char_cap`
/// characters. A failed fetch contributes nothing (logged, never raised).
pub async fn fetch_stylesheets(
    client: &Client,
    links: Vec<Url>,
    config: &FetchConfig,
) -> Vec<String> {
    let timeout = Duration::from_secs(config.stylesheet_timeout_secs);
    let char_cap = config.stylesheet_char_cap;

    let mut handles = Vec::with_capacity(links.len());
    for link in links {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            match fetch_one_stylesheet(&client, &link, timeout, char_cap).await {
                Ok(css) => Some(css),
                Err(e) => {
                    debug!(url = %link, error = %e, "could not fetch stylesheet");
                    None
                }
            }
        }));
    }

    let mut sheets = Vec::new();
    for handle in handles {
        if let Ok(Some(css)) = handle.await {
            sheets.push(css);
        }
    }
    sheets
}

async fn fetch_one_stylesheet(
    client: &Client,
    url: &Url,
    timeout: Duration,
    char_cap: usize,
) -> Result<String> {
    let response = client
        .get(url.as_str())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| BrandLensError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BrandLensError::Network(format!("{url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| BrandLensError::Network(format!("{url}: body read failed: {e}")))?;

    Ok(body.chars().take(char_cap).collect())
}
