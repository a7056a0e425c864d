//! Application configuration for BrandLens.
//!
//! User config lives at `~/.brandlens/brandlens.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BrandLensError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "brandlens.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".brandlens";

// ---------------------------------------------------------------------------
// Config structs (matching brandlens.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum number of linked stylesheets to fetch per page.
    #[serde(default = "default_max_stylesheets")]
    pub max_stylesheets: usize,

    /// Per-stylesheet CSS text cap in characters.
    #[serde(default = "default_stylesheet_char_cap")]
    pub stylesheet_char_cap: usize,

    /// Timeout for the primary page fetch, in seconds.
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for each auxiliary stylesheet fetch, in seconds.
    #[serde(default = "default_stylesheet_timeout")]
    pub stylesheet_timeout_secs: u64,

    /// Default number of logo concepts to generate.
    #[serde(default = "default_concept_count")]
    pub concept_count: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_stylesheets: default_max_stylesheets(),
            stylesheet_char_cap: default_stylesheet_char_cap(),
            page_timeout_secs: default_page_timeout(),
            stylesheet_timeout_secs: default_stylesheet_timeout(),
            concept_count: default_concept_count(),
        }
    }
}

fn default_max_stylesheets() -> usize {
    8
}
fn default_stylesheet_char_cap() -> usize {
    50_000
}
fn default_page_timeout() -> u64 {
    30
}
fn default_stylesheet_timeout() -> u64 {
    15
}
fn default_concept_count() -> usize {
    5
}

/// `[anthropic]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model ID for all generation calls.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (overridable for tests/proxies).
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".into()
}
fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_base_url() -> String {
    "https://api.anthropic.com".into()
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum linked stylesheets fetched per page.
    pub max_stylesheets: usize,
    /// Per-stylesheet CSS text cap in characters.
    pub stylesheet_char_cap: usize,
    /// Primary page fetch timeout in seconds.
    pub page_timeout_secs: u64,
    /// Auxiliary stylesheet fetch timeout in seconds.
    pub stylesheet_timeout_secs: u64,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_stylesheets: config.defaults.max_stylesheets,
            stylesheet_char_cap: config.defaults.stylesheet_char_cap,
            page_timeout_secs: config.defaults.page_timeout_secs,
            stylesheet_timeout_secs: config.defaults.stylesheet_timeout_secs,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.brandlens/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BrandLensError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.brandlens/brandlens.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BrandLensError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BrandLensError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BrandLensError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BrandLensError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BrandLensError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the Anthropic API key from the configured env var.
/// Missing or empty key is a fatal config error.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.anthropic.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(BrandLensError::config(format!(
            "Anthropic API key not found. Set the {var_name} environment variable."
        ))),
    }
}
