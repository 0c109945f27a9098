#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Outbreak endless-mode session.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::SimulationConfig;
use simulation::Simulation;

#[derive(Parser, Debug)]
#[command(
    name = "outbreak",
    version,
    about = "Run a headless Outbreak endless-mode simulation"
)]
struct Cli {
    /// TOML file with `[simulation]`, `[arena]` and `[spawning]` tables.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the arena layout and spawn generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run before stopping.
    #[arg(long)]
    duration: Option<u64>,
    /// Log filter directive; falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,
}

/// Entry point for the Outbreak command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.simulation.seed = seed;
    }
    if let Some(duration) = cli.duration {
        config.simulation.duration_secs = duration;
    }

    info!(
        seed = config.simulation.seed,
        duration_secs = config.simulation.duration_secs,
        "starting simulation"
    );
    let summary = Simulation::new(&config)
        .context("failed to set up simulation")?
        .run();
    println!("{summary}");
    Ok(())
}

fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install logger: {error}"))
}
