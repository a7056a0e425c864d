//! BrandLens CLI — brand identity extraction and generation tool.
//!
//! Extracts a brand profile from any website and drives the logo, asset,
//! and design-system generation chains from it.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
