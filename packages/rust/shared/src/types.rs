//! Core domain types for BrandLens brand profiles and generation artifacts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// BrandProfile
// ---------------------------------------------------------------------------

/// The merged, validated brand identity snapshot for one website.
///
/// Constructed once per extraction request and immutable thereafter; every
/// generation stage consumes it read-only. All fields default so that
/// loosely-shaped request payloads still deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandProfile {
    /// The analyzed website URL (always the source URL, never LLM-echoed).
    #[serde(default)]
    pub url: String,
    /// 1–5 validated `#rrggbb`/`#rgb` hex strings.
    #[serde(default)]
    pub primary_colors: Vec<String>,
    /// Up to 5 validated hex strings, disjoint from `primary_colors`.
    #[serde(default)]
    pub secondary_colors: Vec<String>,
    /// Up to 10 font family names.
    #[serde(default)]
    pub fonts: Vec<String>,
    /// Free-text style description.
    #[serde(default)]
    pub style: String,
    /// Free-text mood adjectives.
    #[serde(default)]
    pub mood: Vec<String>,
    /// Resolved absolute logo URL, if one was found on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// One-sentence logo description from the analysis call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_description: Option<String>,
}

// ---------------------------------------------------------------------------
// PageSummary
// ---------------------------------------------------------------------------

/// Textual page context extracted alongside colors/fonts, used only as
/// LLM prompt context (not a structured profile field).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSummary {
    /// Document `<title>`, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// First `<meta name="description">` content, truncated to 500 chars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Body plain text, truncated to 3000 chars.
    #[serde(default)]
    pub body_excerpt: String,
}

// ---------------------------------------------------------------------------
// Generation artifacts
// ---------------------------------------------------------------------------

/// A suggested output format for asset generation (name + pixel size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFormat {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Output of the asset-creation chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetArtifact {
    /// The image-generation prompt (plain text, used verbatim).
    pub prompt: String,
    /// Suggested output formats. Empty when the formats call yielded nothing.
    #[serde(default)]
    pub suggested_formats: Vec<AssetFormat>,
}

/// One ranked logo candidate from the critique stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoRanking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    /// Index into the candidate `image_urls` list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Shared guidelines, copied into every ranking entry.
    #[serde(default)]
    pub usage_guidelines: Vec<String>,
}

/// Output of the logo-generation chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoArtifact {
    /// Strategy mapping (positioning, attributes, avoid, style_direction).
    /// Kept as a loose map: the shape is LLM-proposed.
    #[serde(default)]
    pub strategy: Map<String, Value>,
    /// Textual image-generation prompts, truncated to the requested count.
    #[serde(default)]
    pub concepts: Vec<String>,
    /// Candidate image URLs handed to the critique stage (may be empty).
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Critique output, truncated to 6 entries.
    #[serde(default)]
    pub rankings: Vec<LogoRanking>,
}

/// Output of the design-system stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignSystemArtifact {
    /// Full style guide (colors, typography, spacing, logo usage rules).
    #[serde(default)]
    pub style_guide: Map<String, Value>,
    /// Pure projection of the colors/typography subset.
    #[serde(default)]
    pub tokens: Map<String, Value>,
}
