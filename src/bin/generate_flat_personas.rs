//! Flat persona generator
//!
//! Generates personas with demographics plus psychological, behavioral and
//! cultural attributes, and writes the batch with its generation stats.
//!
//! Usage:
//!   cargo run --release --bin generate_flat_personas -- [OPTIONS]
//!
//! Options:
//!   --count <N>         Number of personas (default: 100)
//!   --seed <N>          Random seed for reproducibility (optional)
//!   --year <YEAR>       Demographic trend year (2020-2030)
//!   --min-age <N>       Lower age bound (requires --max-age)
//!   --max-age <N>       Upper age bound (requires --min-age)
//!   --location <NAME>   Pin the region, e.g. 서울 or 서울특별시
//!   --config <PATH>     JSON flat config
//!   --output <PATH>     Output JSON path (default: data/flat_personas.json)

use anyhow::{Context, Result};
use clap::Parser;
use persona_synth::flat::{FlatConfig, FlatConstraints, FlatPersonaGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Flat persona generator
#[derive(Parser, Debug)]
#[command(name = "generate_flat_personas")]
#[command(about = "Generate personas with cultural and behavioral attributes")]
struct Args {
    /// Number of personas to generate
    #[arg(long, default_value = "100")]
    count: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Demographic trend year
    #[arg(long)]
    year: Option<i32>,

    /// Lower age bound
    #[arg(long, requires = "max_age")]
    min_age: Option<u32>,

    /// Upper age bound
    #[arg(long, requires = "min_age")]
    max_age: Option<u32>,

    /// Region name, short or full
    #[arg(long)]
    location: Option<String>,

    /// JSON flat config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON path
    #[arg(long, default_value = "data/flat_personas.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FlatConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FlatConfig::default(),
    };

    let constraints = FlatConstraints {
        age_range: args.min_age.zip(args.max_age),
        location: args.location.clone(),
        year: args.year,
        ..Default::default()
    };

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let generator = FlatPersonaGenerator::new(config)?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!("Generating {} flat personas", args.count);
    let batch = generator.generate_personas(args.count, &constraints, &mut rng);

    let writer = BufWriter::new(File::create(&args.output)?);
    serde_json::to_writer_pretty(writer, &batch)?;

    let stats = batch.generation_stats;
    println!("✅ Wrote {} personas to {}", batch.personas.len(), args.output.display());
    println!("   Attempts:       {}", stats.total_attempts);
    println!("   Successful:     {}", stats.successful_generations);
    println!("   Failures:       {}", stats.validation_failures);
    println!("   With warnings:  {}", stats.warnings_count);
    println!("   Success rate:   {:.1}%", batch.success_rate);

    Ok(())
}
