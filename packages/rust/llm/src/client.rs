//! LLM call capability: a narrow trait plus the Anthropic Messages client.
//!
//! Agents depend only on [`LlmClient`], a "prompt in, reply text out"
//! interface; nothing downstream ever sees the provider's response shape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use brandlens_shared::{AppConfig, BrandLensError, Result, resolve_api_key};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("BrandLens/", env!("CARGO_PKG_VERSION"));

/// API version header required by the Messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Hard timeout for one generation call.
const CALL_TIMEOUT_SECS: u64 = 120;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The LLM call capability injected into every generation agent.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return the reply's concatenated text.
    async fn call(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Wire types (Messages API)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

// ---------------------------------------------------------------------------
// AnthropicClient
// ---------------------------------------------------------------------------

/// HTTP client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    /// Construct from application config.
    ///
    /// A missing or empty API key env var fails here, at capability
    /// construction, before any pipeline work starts.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = resolve_api_key(config)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(CALL_TIMEOUT_SECS))
            .build()
            .map_err(|e| BrandLensError::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            model: config.anthropic.model.clone(),
            base_url: config.anthropic.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn call(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!(model = %self.model, max_tokens, "sending generation call");

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrandLensError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(BrandLensError::Llm(format!("HTTP {status}: {snippet}")));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| BrandLensError::Llm(format!("malformed API response: {e}")))?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str, key_env: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.anthropic.base_url = base_url.to_string();
        config.anthropic.api_key_env = key_env.to_string();
        config
    }

    #[test]
    fn missing_api_key_fails_at_construction() {
        let config = test_config("https://api.anthropic.com", "BL_LLM_TEST_UNSET_KEY");
        let result = AnthropicClient::from_config(&config);
        assert!(matches!(result, Err(BrandLensError::Config { .. })));
    }

    #[tokio::test]
    async fn call_concatenates_text_blocks() {
        let server = wiremock::MockServer::start().await;

        let body = serde_json::json!({
            "content": [
                {"type": "text", "text": "{\"style\": "},
                {"type": "tool_use", "id": "x", "name": "n", "input": {}},
                {"type": "text", "text": "\"bold\"}"},
            ]
        });

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/v1/messages"))
            .and(wiremock::matchers::header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        // SAFETY: test-scoped env var with a unique name
        unsafe { std::env::set_var("BL_LLM_TEST_KEY_A", "sk-test") };
        let config = test_config(&server.uri(), "BL_LLM_TEST_KEY_A");
        let client = AnthropicClient::from_config(&config).unwrap();

        let reply = client.call("analyze this", 100).await.unwrap();
        assert_eq!(reply, "{\"style\": \"bold\"}");
    }

    #[tokio::test]
    async fn call_surfaces_api_errors() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(429).set_body_string("rate limited"),
            )
            .mount(&server)
            .await;

        unsafe { std::env::set_var("BL_LLM_TEST_KEY_B", "sk-test") };
        let config = test_config(&server.uri(), "BL_LLM_TEST_KEY_B");
        let client = AnthropicClient::from_config(&config).unwrap();

        let result = client.call("prompt", 100).await;
        match result {
            Err(BrandLensError::Llm(msg)) => assert!(msg.contains("429")),
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_content_yields_empty_text() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"content": []})),
            )
            .mount(&server)
            .await;

        unsafe { std::env::set_var("BL_LLM_TEST_KEY_C", "sk-test") };
        let config = test_config(&server.uri(), "BL_LLM_TEST_KEY_C");
        let client = AnthropicClient::from_config(&config).unwrap();

        assert_eq!(client.call("prompt", 100).await.unwrap(), "");
    }
}
