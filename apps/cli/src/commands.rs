//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};
use tracing::info;

use brandlens_agents::Coordinator;
use brandlens_extract::build_client;
use brandlens_llm::AnthropicClient;
use brandlens_shared::{AppConfig, FetchConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BrandLens — extract a site's visual identity and generate on-brand assets.
#[derive(Parser)]
#[command(
    name = "brandlens",
    version,
    about = "Extract brand identity from any website and generate on-brand assets.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Analyze a website and print its brand profile.
    Analyze {
        /// Website URL to analyze.
        url: String,

        /// Write the profile to a file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run the logo chain: strategy, concepts, optional critique.
    Logo {
        /// Path to a brand profile JSON file (from `analyze`).
        #[arg(long)]
        profile: PathBuf,

        /// Number of logo concepts to generate.
        #[arg(short, long)]
        count: Option<usize>,

        /// Candidate logo image URL to critique (repeatable).
        #[arg(long = "image-url")]
        image_urls: Vec<String>,
    },

    /// Generate an on-brand asset prompt plus suggested formats.
    Asset {
        /// Path to a brand profile JSON file.
        #[arg(long)]
        profile: PathBuf,

        /// Asset type (social, banner, story, ...).
        #[arg(long, default_value = "social")]
        asset_type: String,

        /// Target dimensions, e.g. 1080x1080.
        #[arg(long, default_value = "1080x1080")]
        dimensions: String,

        /// Copy text to feature on the asset.
        #[arg(long)]
        copy: Option<String>,
    },

    /// Generate a style guide and design tokens.
    Design {
        /// Path to a brand profile JSON file.
        #[arg(long)]
        profile: PathBuf,

        /// Print only the exported design tokens.
        #[arg(long)]
        tokens_only: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "brandlens=info",
        1 => "brandlens=debug",
        _ => "brandlens=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze { url, out } => cmd_analyze(&url, out.as_deref()).await,
        Command::Logo {
            profile,
            count,
            image_urls,
        } => cmd_logo(&profile, count, image_urls).await,
        Command::Asset {
            profile,
            asset_type,
            dimensions,
            copy,
        } => cmd_asset(&profile, &asset_type, &dimensions, copy.as_deref()).await,
        Command::Design {
            profile,
            tokens_only,
        } => cmd_design(&profile, tokens_only).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_analyze(url: &str, out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let llm = AnthropicClient::from_config(&config)?;
    let fetch = FetchConfig::from(&config);
    let http = build_client(&fetch)?;

    info!(url, "analyzing website");

    let spinner = spinner("Analyzing website...");
    let coordinator = Coordinator::new(&llm, http, fetch);
    let result = coordinator
        .route("brand_onboarding", &json!({ "url": url }))
        .await;
    spinner.finish_and_clear();

    let profile = result?;
    let rendered = serde_json::to_string_pretty(&profile)?;

    match out {
        Some(path) => {
            std::fs::write(path, &rendered)
                .map_err(|e| eyre!("cannot write profile to '{}': {e}", path.display()))?;
            println!("Brand profile written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

async fn cmd_logo(profile_path: &Path, count: Option<usize>, image_urls: Vec<String>) -> Result<()> {
    let config = load_config()?;
    let llm = AnthropicClient::from_config(&config)?;
    let fetch = FetchConfig::from(&config);
    let http = build_client(&fetch)?;

    let profile = read_profile(profile_path)?;
    let count = count.unwrap_or(config.defaults.concept_count);

    info!(count, candidates = image_urls.len(), "running logo chain");

    let payload = json!({
        "brand_profile": profile,
        "count": count,
        "image_urls": image_urls,
    });

    let spinner = spinner("Generating logo concepts...");
    let coordinator = Coordinator::new(&llm, http, fetch);
    let result = coordinator.route("logo_generation", &payload).await;
    spinner.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn cmd_asset(
    profile_path: &Path,
    asset_type: &str,
    dimensions: &str,
    copy: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let llm = AnthropicClient::from_config(&config)?;
    let fetch = FetchConfig::from(&config);
    let http = build_client(&fetch)?;

    let profile = read_profile(profile_path)?;

    info!(asset_type, dimensions, "running asset chain");

    let mut payload = json!({
        "brand_profile": profile,
        "asset_type": asset_type,
        "dimensions": dimensions,
    });
    if let Some(text) = copy {
        payload["copy_text"] = Value::String(text.to_string());
    }

    let spinner = spinner("Generating asset prompt...");
    let coordinator = Coordinator::new(&llm, http, fetch);
    let result = coordinator.route("create_asset", &payload).await;
    spinner.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn cmd_design(profile_path: &Path, tokens_only: bool) -> Result<()> {
    let config = load_config()?;
    let llm = AnthropicClient::from_config(&config)?;
    let fetch = FetchConfig::from(&config);
    let http = build_client(&fetch)?;

    let profile = read_profile(profile_path)?;

    info!(tokens_only, "running design-system chain");

    let payload = json!({ "brand_profile": profile });

    let spinner = spinner("Generating style guide...");
    let coordinator = Coordinator::new(&llm, http, fetch);
    let result = coordinator.route("design_system", &payload).await;
    spinner.finish_and_clear();

    let artifact = result?;
    let output = if tokens_only {
        artifact.get("tokens").cloned().unwrap_or(Value::Null)
    } else {
        artifact
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a brand profile JSON file into a JSON value for the coordinator.
fn read_profile(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("cannot read profile '{}': {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| eyre!("invalid profile JSON in '{}': {e}", path.display()))
}

/// Steady-tick spinner shown while a chain runs.
fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("static spinner template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}
