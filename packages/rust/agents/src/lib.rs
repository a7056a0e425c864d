//! Generation agents and request routing for BrandLens.
//!
//! - [`BrandAnalyzer`] — website extraction + analysis into a [`BrandProfile`]
//! - [`LogoGenerator`] / [`run_logo_chain`] — strategy → concepts → critique
//! - [`AssetCreator`] / [`run_asset_chain`] — prompt + format suggestions
//! - [`DesignSystem`] / [`run_design_chain`] — style guide + token export
//! - [`Coordinator`] — one entry point that routes typed requests to a chain

pub mod analyzer;
pub mod asset;
pub mod coordinator;
pub mod design;
pub mod logo;
pub mod merge;

pub use analyzer::BrandAnalyzer;
pub use asset::{AssetCreator, run_asset_chain};
pub use coordinator::{Coordinator, REQUEST_TYPES};
pub use design::{DesignSystem, export_tokens, run_design_chain};
pub use logo::{DEFAULT_CONCEPT_COUNT, LogoGenerator, run_logo_chain};
pub use merge::{is_valid_hex, merge_profile};

use brandlens_shared::BrandProfile;

/// Render a profile as prompt context. Serialization of these plain data
/// types cannot fail; an empty object is the defensive floor.
pub(crate) fn profile_context(profile: &BrandProfile) -> String {
    serde_json::to_string(profile).unwrap_or_else(|_| "{}".to_string())
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------
