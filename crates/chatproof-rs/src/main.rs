//! Command-line entry point: score the chat export in the input directory.

use anyhow::Context;
use chatproof_rs::config::{LayeredConfigOptions, ProofConfig};
use chatproof_rs::core::Proof;
use chatproof_rs::validator::HttpValidationAuthority;
use chatproof_rs::{evaluate_input_dir, init_logging};
use chrono::Utc;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the proof runner.
#[derive(Parser)]
#[command(name = "chatproof", version)]
struct Cli {
    /// Extra chatproof.json5 layer applied over discovered configs (repeatable)
    #[arg(long)]
    config: Vec<PathBuf>,
    /// Directory holding chats.json (overrides config)
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Directory results.json is written to (overrides config)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    // One submission, evaluated start to finish on a single thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let options = cli
        .config
        .iter()
        .fold(LayeredConfigOptions::new(&cwd), |options, path| {
            options.with_runtime_path(path)
        });
    let layered =
        ProofConfig::load_layered_with_options(options).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());

    let mut config = layered.config;
    if let Some(dir) = cli.input_dir {
        config.input_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir.to_string_lossy().into_owned();
    }

    let authority = HttpValidationAuthority::from_config(&config)
        .context("failed to build validation authority client")?;
    info!(
        "starting proof (input_dir={}, authority={})",
        config.input_dir,
        authority.base_url()
    );
    let proof = Proof::new(config, Arc::new(authority)).context("invalid proof configuration")?;
    let (report, path) = evaluate_input_dir(&proof, Utc::now())
        .await
        .context("proof evaluation failed")?;

    println!(
        "valid={} score={} quality={} uniqueness={} report={}",
        report.valid,
        report.score,
        report.quality,
        report.uniqueness,
        path.display()
    );
    Ok(())
}
