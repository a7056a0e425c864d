//! Request routing: resolve a request type + payload to exactly one chain.
//!
//! The coordinator holds no persisted state. Unrecognized request types and
//! missing required fields are typed errors returned before any stage runs;
//! errors raised inside a stage propagate untouched.

use reqwest::Client;
use serde_json::Value;
use tracing::{info, instrument};
use url::Url;

use brandlens_llm::LlmClient;
use brandlens_shared::{BrandLensError, BrandProfile, FetchConfig, Result};

use crate::analyzer::BrandAnalyzer;
use crate::asset::run_asset_chain;
use crate::design::run_design_chain;
use crate::logo::{DEFAULT_CONCEPT_COUNT, run_logo_chain};

const DEFAULT_ASSET_TYPE: &str = "social";
const DEFAULT_DIMENSIONS: &str = "1080x1080";

/// Request types the coordinator understands.
pub const REQUEST_TYPES: [&str; 4] = [
    "brand_onboarding",
    "logo_generation",
    "create_asset",
    "design_system",
];

pub struct Coordinator<'a> {
    llm: &'a dyn LlmClient,
    http: Client,
    fetch: FetchConfig,
}

impl<'a> Coordinator<'a> {
    pub fn new(llm: &'a dyn LlmClient, http: Client, fetch: FetchConfig) -> Self {
        Self { llm, http, fetch }
    }

    /// Dispatch one request to its chain and return the artifact as JSON.
    #[instrument(skip_all, fields(request_type))]
    pub async fn route(&self, request_type: &str, payload: &Value) -> Result<Value> {
        info!(request_type, "routing request");
        match request_type {
            "brand_onboarding" => {
                let url = required_url(payload)?;
                let analyzer = BrandAnalyzer::new(self.llm);
                let profile = analyzer.analyze(&self.http, &url, &self.fetch).await?;
                to_json(&profile)
            }
            "logo_generation" => {
                let profile = payload_profile(payload)?;
                let count = payload
                    .get("count")
                    .and_then(Value::as_u64)
                    .map(|n| n as usize)
                    .unwrap_or(DEFAULT_CONCEPT_COUNT);
                let image_urls = string_array(payload.get("image_urls"));
                let artifact =
                    run_logo_chain(self.llm, &profile, count, &image_urls).await?;
                to_json(&artifact)
            }
            "create_asset" => {
                let profile = payload_profile(payload)?;
                let asset_type = payload
                    .get("asset_type")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_ASSET_TYPE);
                let dimensions = payload
                    .get("dimensions")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_DIMENSIONS);
                let copy_text = payload.get("copy_text").and_then(Value::as_str);
                let artifact =
                    run_asset_chain(self.llm, &profile, asset_type, dimensions, copy_text)
                        .await?;
                to_json(&artifact)
            }
            "design_system" => {
                let profile = payload_profile(payload)?;
                let artifact = run_design_chain(self.llm, &profile).await?;
                to_json(&artifact)
            }
            other => Err(BrandLensError::UnknownRequest {
                request_type: other.to_string(),
            }),
        }
    }
}

/// Extract and validate the `url` field; absent or empty is a typed error.
fn required_url(payload: &Value) -> Result<Url> {
    let raw = payload
        .get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BrandLensError::missing_field("url"))?;
    Url::parse(raw).map_err(|e| BrandLensError::validation(format!("invalid url {raw:?}: {e}")))
}

/// The brand profile rides in `brand_profile`, or the payload itself is one.
fn payload_profile(payload: &Value) -> Result<BrandProfile> {
    let raw = payload.get("brand_profile").unwrap_or(payload);
    serde_json::from_value(raw.clone())
        .map_err(|e| BrandLensError::validation(format!("invalid brand profile: {e}")))
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn to_json<T: serde::Serialize>(artifact: &T) -> Result<Value> {
    serde_json::to_value(artifact).map_err(|e| BrandLensError::parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubLlm;
    use serde_json::json;

    fn coordinator<'a>(llm: &'a StubLlm) -> Coordinator<'a> {
        Coordinator::new(llm, Client::new(), FetchConfig::default())
    }

    #[tokio::test]
    async fn unknown_request_type_is_a_typed_error() {
        let stub = StubLlm::new(vec![]);
        let err = coordinator(&stub)
            .route("resize", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BrandLensError::UnknownRequest { ref request_type } if request_type == "resize"
        ));
        // No stage was invoked
        assert!(stub.prompts().is_empty());
    }

    #[tokio::test]
    async fn every_listed_request_type_dispatches() {
        let stub = StubLlm::failing("unavailable");
        let coord = coordinator(&stub);

        // Each known type reaches its chain (or field validation) rather
        // than falling through to the unknown-type arm.
        for request_type in REQUEST_TYPES {
            let err = coord.route(request_type, &json!({})).await.unwrap_err();
            assert!(
                !matches!(err, BrandLensError::UnknownRequest { .. }),
                "{request_type} should dispatch",
            );
        }
    }

    #[tokio::test]
    async fn onboarding_requires_a_url() {
        let stub = StubLlm::new(vec![]);
        let coord = coordinator(&stub);

        for payload in [json!({}), json!({"url": ""}), json!({"url": "   "})] {
            let err = coord.route("brand_onboarding", &payload).await.unwrap_err();
            assert!(matches!(
                err,
                BrandLensError::MissingField { ref field } if field == "url"
            ));
        }

        let err = coord
            .route("brand_onboarding", &json!({"url": "not a url"}))
            .await
            .unwrap_err();
        assert!(matches!(err, BrandLensError::Validation { .. }));
    }

    #[tokio::test]
    async fn onboarding_runs_the_extraction_pipeline() {
        let server = wiremock::MockServer::start().await;
        let html = r#"<html><head>
            <link rel="stylesheet" href="/theme.css">
        </head><body>
            <div style="color:#FF0000">Launch</div>
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

        let stub = StubLlm::new(vec![r##"{"primary_colors": ["#ff0000"]}"##.into()]);
        let result = coordinator(&stub)
            .route("brand_onboarding", &json!({"url": server.uri()}))
            .await
            .unwrap();

        assert_eq!(result["primary_colors"], json!(["#ff0000"]));
        assert_eq!(result["secondary_colors"], json!(["#00ff00"]));
    }

    #[tokio::test]
    async fn logo_route_accepts_nested_or_bare_profile() {
        let replies = || {
            vec![
                r#"{"positioning": "p"}"#.to_string(),
                r#"{"concepts": ["c1", "c2", "c3", "c4", "c5", "c6"]}"#.to_string(),
            ]
        };

        let stub = StubLlm::new(replies());
        let nested = json!({"brand_profile": {"url": "https://example.com/", "style": "minimal"}});
        let result = coordinator(&stub)
            .route("logo_generation", &nested)
            .await
            .unwrap();
        assert_eq!(result["concepts"].as_array().unwrap().len(), 5);
        assert_eq!(result["strategy"]["positioning"], "p");

        let stub = StubLlm::new(replies());
        let bare = json!({"url": "https://example.com/", "style": "minimal", "count": 2});
        let result = coordinator(&stub)
            .route("logo_generation", &bare)
            .await
            .unwrap();
        assert_eq!(result["concepts"], json!(["c1", "c2"]));
    }

    #[tokio::test]
    async fn asset_route_applies_defaults() {
        let stub = StubLlm::new(vec!["an image prompt".into(), r#"{"formats": []}"#.into()]);
        let result = coordinator(&stub)
            .route("create_asset", &json!({"brand_profile": {"style": "bold"}}))
            .await
            .unwrap();

        assert_eq!(result["prompt"], "an image prompt");
        let prompts = stub.prompts();
        assert!(prompts[0].contains("Asset type: social"));
        assert!(prompts[0].contains("Dimensions: 1080x1080"));
    }

    #[tokio::test]
    async fn design_route_returns_guide_and_tokens() {
        let stub = StubLlm::new(vec![
            r##"{"colors": {"primary": "#635bff"}, "spacing": {}}"##.into(),
        ]);
        let result = coordinator(&stub)
            .route("design_system", &json!({"brand_profile": {}}))
            .await
            .unwrap();

        assert_eq!(result["style_guide"]["colors"]["primary"], "#635bff");
        assert_eq!(result["tokens"]["colors"]["primary"], "#635bff");
        assert!(result["tokens"].get("spacing").is_none());
    }

    #[tokio::test]
    async fn stage_errors_propagate_untouched() {
        let stub = StubLlm::failing("rate limited");
        let err = coordinator(&stub)
            .route("design_system", &json!({"brand_profile": {}}))
            .await
            .unwrap_err();
        assert!(matches!(err, BrandLensError::Llm(ref msg) if msg == "rate limited"));
    }
}
