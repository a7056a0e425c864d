//! Asset creation: on-brand image prompt plus suggested output formats.
//!
//! The brief handed to the model is built deterministically from the profile,
//! keeping only well-formed hex colors. The prompt call and the format call
//! are independent and run concurrently.

use serde_json::Value;
use tracing::instrument;

use brandlens_llm::{LlmClient, normalize_reply};
use brandlens_shared::{AssetArtifact, AssetFormat, BrandProfile, Result};

use crate::merge::is_valid_hex;
use crate::profile_context;

const PROMPT_MAX_TOKENS: u32 = 800;
const FORMATS_MAX_TOKENS: u32 = 1000;

/// How many fonts/mood entries the brief carries.
const BRIEF_LIST_CAP: usize = 5;

pub struct AssetCreator<'a> {
    llm: &'a dyn LlmClient,
}

impl<'a> AssetCreator<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// One call producing a plain-text image-generation prompt.
    pub async fn generate_prompt(
        &self,
        profile: &BrandProfile,
        asset_type: &str,
        dimensions: &str,
        copy_text: Option<&str>,
    ) -> Result<String> {
        let brief = build_brief(profile);
        let prompt = format!(
            "{brief}\n\
             Asset type: {asset_type}. Dimensions: {dimensions}. Copy: {copy}.\n\
             Write one detailed image prompt for an image model. \
             Use the exact hex colors. Plain text only.",
            copy = copy_text.unwrap_or("none"),
        );
        let reply = self.llm.call(&prompt, PROMPT_MAX_TOKENS).await?;
        Ok(reply.trim().to_string())
    }

    /// One call producing suggested output formats (name + pixel size).
    pub async fn suggest_formats(&self, profile: &BrandProfile) -> Result<Vec<AssetFormat>> {
        let prompt = format!(
            "Brand: {}. Return JSON: {{ \"formats\": [ {{ \"name\": \"Instagram Post\", \
             \"width\": 1080, \"height\": 1080 }}, ... ] }}",
            profile_context(profile),
        );
        let reply = self.llm.call(&prompt, FORMATS_MAX_TOKENS).await?;
        let output = normalize_reply(&reply);

        let formats = match output.get("formats") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect(),
            _ => Vec::new(),
        };
        Ok(formats)
    }
}

/// Deterministic textual brief from the profile's identity fields.
/// Only well-formed hex strings make it into the color lines.
fn build_brief(profile: &BrandProfile) -> String {
    let primary = hex_only(&profile.primary_colors);
    let secondary = hex_only(&profile.secondary_colors);
    let fonts = joined_or_none(profile.fonts.iter().take(BRIEF_LIST_CAP));
    let mood = joined_or_none(profile.mood.iter().take(BRIEF_LIST_CAP));

    format!(
        "Brand: Primary colors (hex): {primary}. Secondary: {secondary}. \
         Style: {style}. Fonts: {fonts}. Mood: {mood}.",
        style = profile.style,
    )
}

fn hex_only(colors: &[String]) -> String {
    joined_or_none(colors.iter().filter(|c| is_valid_hex(c)))
}

fn joined_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.cloned().collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "none".into() } else { joined }
}

/// Run both asset calls concurrently and assemble the artifact.
#[instrument(skip_all, fields(asset_type, dimensions))]
pub async fn run_asset_chain(
    llm: &dyn LlmClient,
    profile: &BrandProfile,
    asset_type: &str,
    dimensions: &str,
    copy_text: Option<&str>,
) -> Result<AssetArtifact> {
    let agent = AssetCreator::new(llm);

    let (prompt, suggested_formats) = tokio::try_join!(
        agent.generate_prompt(profile, asset_type, dimensions, copy_text),
        agent.suggest_formats(profile),
    )?;

    Ok(AssetArtifact {
        prompt,
        suggested_formats,
    })
}
