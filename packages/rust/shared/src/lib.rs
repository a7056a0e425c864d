//! Shared types, error model, and configuration for BrandLens.
//!
//! This crate is the foundation depended on by all other BrandLens crates.
//! It provides:
//! - [`BrandLensError`] — the unified error type
//! - Domain types ([`BrandProfile`], [`PageSummary`], generation artifacts)
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod fallback;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnthropicConfig, AppConfig, DefaultsConfig, FetchConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{BrandLensError, Result};
pub use fallback::{non_empty_or, valid_or};
pub use types::{
    AssetArtifact, AssetFormat, BrandProfile, DesignSystemArtifact, LogoArtifact, LogoRanking,
    PageSummary,
};
