//! Logo generation chain: strategy, concepts, critique/ranking.
//!
//! Each stage's output is the literal input context for the next stage; no
//! stage re-derives earlier context. A reply the normalizer cannot recover
//! degrades to the empty structure for that stage instead of failing.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use brandlens_llm::{LlmClient, normalize_reply};
use brandlens_shared::{BrandProfile, LogoArtifact, LogoRanking, Result};

use crate::profile_context;

const STRATEGY_MAX_TOKENS: u32 = 1500;
const CONCEPTS_MAX_TOKENS: u32 = 2000;
const CRITIQUE_MAX_TOKENS: u32 = 2000;

/// Cap on critique rankings.
const MAX_RANKINGS: usize = 6;

/// Default number of concepts requested by the chain entry point.
pub const DEFAULT_CONCEPT_COUNT: usize = 5;

pub struct LogoGenerator<'a> {
    llm: &'a dyn LlmClient,
}

impl<'a> LogoGenerator<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// Stage 1: brand positioning strategy for the logo.
    pub async fn analyze_strategy(&self, profile: &BrandProfile) -> Result<Map<String, Value>> {
        let prompt = format!(
            "Brand profile: {}\n\
             Return JSON: positioning, attributes (array), avoid (array), style_direction.",
            profile_context(profile),
        );
        let reply = self.llm.call(&prompt, STRATEGY_MAX_TOKENS).await?;
        Ok(normalize_reply(&reply))
    }

    /// Stage 2: textual image-generation prompts, truncated to `count`.
    pub async fn generate_concepts(
        &self,
        strategy: &Map<String, Value>,
        count: usize,
    ) -> Result<Vec<String>> {
        let prompt = format!(
            "Strategy: {}\n\
             Generate {count} logo concept prompts for an image model. \
             Return JSON: {{ \"concepts\": [\"...\", ...] }}",
            Value::Object(strategy.clone()),
        );
        let reply = self.llm.call(&prompt, CONCEPTS_MAX_TOKENS).await?;
        let output = normalize_reply(&reply);

        let concepts = match output.get("concepts") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .take(count)
                .collect(),
            _ => Vec::new(),
        };
        Ok(concepts)
    }

    /// Stage 3: rank candidate logo images by index, with shared usage
    /// guidelines copied onto every ranking entry.
    pub async fn critique_and_rank(
        &self,
        image_urls: &[String],
        profile: &BrandProfile,
    ) -> Result<Vec<LogoRanking>> {
        let prompt = format!(
            "Brand: {}. {} logo candidate URLs, referenced by index. \
             Return JSON: rankings (array of rank, url_index, score, reason), \
             usage_guidelines (array).",
            profile_context(profile),
            image_urls.len(),
        );
        let reply = self.llm.call(&prompt, CRITIQUE_MAX_TOKENS).await?;
        let output = normalize_reply(&reply);

        let guidelines: Vec<String> = match output.get("usage_guidelines") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        let rankings = match output.get("rankings") {
            Some(Value::Array(items)) => items
                .iter()
                .take(MAX_RANKINGS)
                .filter_map(|entry| {
                    let mut ranking: LogoRanking =
                        serde_json::from_value(entry.clone()).ok()?;
                    ranking.usage_guidelines = guidelines.clone();
                    Some(ranking)
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(rankings)
    }
}

/// Run the full chain for a profile: strategy, then concepts. The critique
/// stage runs only when candidate image URLs are supplied.
#[instrument(skip_all, fields(concepts = concept_count, candidates = image_urls.len()))]
pub async fn run_logo_chain(
    llm: &dyn LlmClient,
    profile: &BrandProfile,
    concept_count: usize,
    image_urls: &[String],
) -> Result<LogoArtifact> {
    let agent = LogoGenerator::new(llm);

    let strategy = agent.analyze_strategy(profile).await?;
    let concepts = agent.generate_concepts(&strategy, concept_count).await?;

    let rankings = if image_urls.is_empty() {
        debug!("no candidate images supplied, skipping critique stage");
        Vec::new()
    } else {
        agent.critique_and_rank(image_urls, profile).await?
    };

    Ok(LogoArtifact {
        strategy,
        concepts,
        image_urls: image_urls.to_vec(),
        rankings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubLlm, profile_fixture};

    #[tokio::test]
    async fn chain_threads_strategy_into_concepts() {
        let stub = StubLlm::new(vec![
            r#"{"positioning": "bold infra", "attributes": ["fast"], "avoid": ["clutter"], "style_direction": "geometric"}"#.into(),
            r#"{"concepts": ["a", "b", "c"]}"#.into(),
        ]);

        let artifact = run_logo_chain(&stub, &profile_fixture(), 5, &[])
            .await
            .unwrap();

        assert_eq!(artifact.strategy["positioning"], "bold infra");
        assert_eq!(artifact.concepts, vec!["a", "b", "c"]);
        assert!(artifact.rankings.is_empty());

        // Stage 2's prompt embeds stage 1's literal output
        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("bold infra"));
    }

    #[tokio::test]
    async fn concepts_truncated_to_requested_count() {
        let stub = StubLlm::new(vec![
            "{}".into(),
            r#"{"concepts": ["1", "2", "3", "4", "5"]}"#.into(),
        ]);

        let artifact = run_logo_chain(&stub, &profile_fixture(), 2, &[])
            .await
            .unwrap();
        assert_eq!(artifact.concepts, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn unrecoverable_reply_degrades_to_empty() {
        let stub = StubLlm::new(vec![
            "not json at all".into(),
            "also not json".into(),
        ]);

        let artifact = run_logo_chain(&stub, &profile_fixture(), 5, &[])
            .await
            .unwrap();
        assert!(artifact.strategy.is_empty());
        assert!(artifact.concepts.is_empty());
    }

    #[tokio::test]
    async fn critique_caps_rankings_and_copies_guidelines() {
        let entries: Vec<String> = (1..=8)
            .map(|i| format!(r#"{{"rank": {i}, "url_index": {}, "score": 9.{i}, "reason": "r{i}"}}"#, i - 1))
            .collect();
        let reply = format!(
            r#"{{"rankings": [{}], "usage_guidelines": ["keep clear space", "never stretch"]}}"#,
            entries.join(","),
        );
        let stub = StubLlm::new(vec![reply]);

        let urls: Vec<String> = (0..8).map(|i| format!("https://cdn.example/{i}.png")).collect();
        let agent = LogoGenerator::new(&stub);
        let rankings = agent
            .critique_and_rank(&urls, &profile_fixture())
            .await
            .unwrap();

        assert_eq!(rankings.len(), 6);
        assert_eq!(rankings[0].rank, Some(1));
        assert_eq!(rankings[0].url_index, Some(0));
        assert_eq!(rankings[0].usage_guidelines, vec!["keep clear space", "never stretch"]);
        assert_eq!(rankings[5].usage_guidelines.len(), 2);
    }

    #[tokio::test]
    async fn critique_runs_only_with_candidates() {
        let stub = StubLlm::new(vec![
            "{}".into(),
            r#"{"concepts": []}"#.into(),
            r#"{"rankings": [{"rank": 1, "url_index": 0, "score": 8.0, "reason": "clean"}], "usage_guidelines": []}"#.into(),
        ]);

        let urls = vec!["https://cdn.example/a.png".to_string()];
        let artifact = run_logo_chain(&stub, &profile_fixture(), 3, &urls)
            .await
            .unwrap();

        assert_eq!(artifact.image_urls, urls);
        assert_eq!(artifact.rankings.len(), 1);
        assert_eq!(artifact.rankings[0].score, Some(8.0));
    }
}
