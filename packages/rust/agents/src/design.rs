//! Design-system stage: style guide generation and token export.

use serde_json::{Map, Value};
use tracing::instrument;

use brandlens_llm::{LlmClient, normalize_reply};
use brandlens_shared::{BrandProfile, DesignSystemArtifact, Result};

use crate::profile_context;

const STYLE_GUIDE_MAX_TOKENS: u32 = 2000;

pub struct DesignSystem<'a> {
    llm: &'a dyn LlmClient,
}

impl<'a> DesignSystem<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// One call producing the full style guide mapping.
    pub async fn generate_style_guide(
        &self,
        profile: &BrandProfile,
    ) -> Result<Map<String, Value>> {
        let prompt = format!(
            "Brand profile: {}\n\
             Return JSON style guide: colors (primary, secondary), typography \
             (headings, body), spacing, logo_usage (clear_space, min_size, donots).",
            profile_context(profile),
        );
        let reply = self.llm.call(&prompt, STYLE_GUIDE_MAX_TOKENS).await?;
        Ok(normalize_reply(&reply))
    }
}

/// Pure projection of the style guide down to design tokens. No LLM call.
pub fn export_tokens(style_guide: &Map<String, Value>) -> Map<String, Value> {
    let mut tokens = Map::new();
    for key in ["colors", "typography"] {
        if let Some(value) = style_guide.get(key) {
            tokens.insert(key.to_string(), value.clone());
        }
    }
    tokens
}

/// Generate the style guide and derive its tokens in one pass.
#[instrument(skip_all)]
pub async fn run_design_chain(
    llm: &dyn LlmClient,
    profile: &BrandProfile,
) -> Result<DesignSystemArtifact> {
    let agent = DesignSystem::new(llm);
    let style_guide = agent.generate_style_guide(profile).await?;
    let tokens = export_tokens(&style_guide);
    Ok(DesignSystemArtifact { style_guide, tokens })
}
