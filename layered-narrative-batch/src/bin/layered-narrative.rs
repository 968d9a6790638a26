//! Write co-occurrence artifacts and quote features for a directory of documents.
//!
//! Usage:
//!   layered-narrative --input stories --characters characters --output out
//!   layered-narrative --config batch.toml --threads 8

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use layered_narrative_batch::{run_batch, BatchConfig};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[derive(Parser)]
#[command(name = "layered-narrative")]
#[command(about = "Character co-occurrence and quote features for narrative corpora")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of <stem>.tokens.json files (overrides the config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory of <stem>.chars alias files (overrides the config)
    #[arg(long)]
    characters: Option<PathBuf>,

    /// Output directory (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worker threads, 0 for one per core (overrides the config)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Also write <stem>_features.json
    #[arg(long)]
    features: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(characters) = args.characters {
        config.character_dir = characters;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if args.features {
        config.write_features = true;
    }

    let summary = run_batch(&config)?;
    println!(
        "{} documents, {} degraded, {} failed",
        summary.documents, summary.degraded, summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} documents could not be written", summary.failed);
    }
    Ok(())
}
