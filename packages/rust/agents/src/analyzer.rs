//! Brand analyzer: deterministic extraction + one analysis call + merge.

use reqwest::Client;
use tracing::{info, instrument};
use url::Url;

use brandlens_extract::{ExtractedSignals, extract_signals};
use brandlens_llm::{LlmClient, normalize_reply};
use brandlens_shared::{BrandProfile, FetchConfig, Result};

use crate::merge::merge_profile;

/// Token budget for the analysis call.
const ANALYSIS_MAX_TOKENS: u32 = 2000;

/// Extracts a brand identity profile from a website.
pub struct BrandAnalyzer<'a> {
    llm: &'a dyn LlmClient,
}

impl<'a> BrandAnalyzer<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// Run the extraction pipeline for one URL.
    ///
    /// The deterministic pass always runs first; its candidates both seed the
    /// LLM prompt and serve as the fallback when the reply fails validation.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn analyze(
        &self,
        http: &Client,
        url: &Url,
        fetch: &FetchConfig,
    ) -> Result<BrandProfile> {
        let signals = extract_signals(http, url, fetch).await?;

        let prompt = build_analysis_prompt(url, &signals);
        let reply = self.llm.call(&prompt, ANALYSIS_MAX_TOKENS).await?;
        let output = normalize_reply(&reply);

        let profile = merge_profile(
            &output,
            &signals.colors,
            &signals.fonts,
            signals.logo_url.as_ref(),
            url,
        );

        info!(
            primary = profile.primary_colors.len(),
            secondary = profile.secondary_colors.len(),
            fonts = profile.fonts.len(),
            logo = profile.logo_url.is_some(),
            "brand analysis complete"
        );

        Ok(profile)
    }
}

/// Build the analysis prompt from page context and deterministic candidates.
fn build_analysis_prompt(url: &Url, signals: &ExtractedSignals) -> String {
    let logo = signals
        .logo_url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "none".into());

    format!(
        "Analyze this website and return JSON only:\n\
         - primary_colors: [hex from extracted list, 1-3 main]\n\
         - secondary_colors: [hex from extracted list, 1-3]\n\
         - fonts: [from extracted list or infer]\n\
         - style: short description\n\
         - mood: [adjectives]\n\
         - logo_description: one sentence\n\n\
         Use the extracted colors/fonts when possible. Website:\n\
         URL: {url}\n\
         Page title: {title}\n\
         Meta description: {description}\n\
         Extracted from CSS/HTML: colors (hex) = {colors:?}, fonts = {fonts:?}, logo_url = {logo}\n\
         Body excerpt: {body}\n",
        title = signals.summary.title.as_deref().unwrap_or(""),
        description = signals.summary.meta_description.as_deref().unwrap_or(""),
        colors = signals.colors,
        fonts = signals.fonts,
        body = signals.summary.body_excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubLlm;

    async fn mock_site() -> wiremock::MockServer {
        let server = wiremock::MockServer::start().await;

        let html = r#"<html><head>
            <title>Acme</title>
            <link rel="stylesheet" href="/theme.css">
        </head><body>
            <header><img class="logo" src="/logo.svg"></header>
            <div style="color:#FF0000">Sale</div>
        </body></html>"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/theme.css"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(":root { --brand: #00ff00; }"),
            )
            .mount(&server)
            .await;

        server
    }

    #[tokio::test]
    async fn analysis_merges_llm_and_extracted() {
        let server = mock_site().await;

        let stub = StubLlm::new(vec![r##"{"primary_colors": ["#ff0000"], "style": "bold"}"##.into()]);
        let analyzer = BrandAnalyzer::new(&stub);

        let http = reqwest::Client::new();
        let url = Url::parse(&server.uri()).unwrap();
        let profile = analyzer
            .analyze(&http, &url, &FetchConfig::default())
            .await
            .unwrap();

        assert_eq!(profile.primary_colors, vec!["#ff0000"]);
        assert_eq!(profile.secondary_colors, vec!["#00ff00"]);
        assert_eq!(profile.style, "bold");
        assert!(profile.logo_url.unwrap().ends_with("/logo.svg"));
        assert!(profile.url.starts_with("http://"));
    }

    #[tokio::test]
    async fn unparseable_reply_falls_back_to_extraction() {
        let server = mock_site().await;

        let stub = StubLlm::new(vec!["Sorry, I can't produce JSON today.".into()]);
        let analyzer = BrandAnalyzer::new(&stub);

        let http = reqwest::Client::new();
        let url = Url::parse(&server.uri()).unwrap();
        let profile = analyzer
            .analyze(&http, &url, &FetchConfig::default())
            .await
            .unwrap();

        // Deterministic floor: extracted colors promoted, style empty
        assert_eq!(profile.primary_colors, vec!["#00ff00", "#ff0000"]);
        assert!(profile.style.is_empty());
    }

    #[tokio::test]
    async fn prompt_carries_extracted_candidates() {
        let server = mock_site().await;

        let stub = StubLlm::new(vec!["{}".into()]);
        let analyzer = BrandAnalyzer::new(&stub);

        let http = reqwest::Client::new();
        let url = Url::parse(&server.uri()).unwrap();
        analyzer
            .analyze(&http, &url, &FetchConfig::default())
            .await
            .unwrap();

        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("#00ff00"));
        assert!(prompts[0].contains("Page title: Acme"));
    }
}
