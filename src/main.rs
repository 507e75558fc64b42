// src/main.rs

use anyhow::Result;
use clap::Parser;
use mcpkg::{build_manifest, emit, LoadedConfig, MachineConfig, PackagePolicy, StagingRoot};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "mcpkg")]
#[command(author, version, about = "Convert machine-config documents into OS packages", long_about = None)]
struct Cli {
    /// Path to the machine config document
    input: PathBuf,

    /// Output package format
    #[arg(short, long, default_value = "rpm")]
    format: String,

    /// Directory to write the package into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let document = MachineConfig::load(&cli.input)?;
    let mut config = LoadedConfig::new(document);

    // Removed recursively on every exit path when dropped.
    let staging = StagingRoot::new()?;

    let files = config.translate()?;
    let staged = staging.materialize(files)?;
    info!("Staged {} files under {}", staged.len(), staging.path().display());

    let manifest = build_manifest(&mut config, staging.path(), &PackagePolicy::default())?;

    let output = emit(&manifest, &cli.format, &cli.output_dir)?;

    println!("Wrote {}", output.display());

    Ok(())
}
