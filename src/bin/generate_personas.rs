//! Hierarchical persona generator
//!
//! Generates personas with consistent age, education, marital status,
//! occupation, income and location, and writes them as JSON or CSV.
//!
//! Usage:
//!   cargo run --release --bin generate_personas -- [OPTIONS]
//!
//! Options:
//!   --count <N>              Number of personas (default: 1000)
//!   --seed <N>               Random seed for reproducibility (optional)
//!   --reference-data <PATH>  Census CSV used to calibrate education and marital status
//!   --config <PATH>          JSON generator config
//!   --output <PATH>          Output path (default: data/personas.json)
//!   --format <json|csv>      Output format (default: json)
//!   --analyze                Print a quality report after generating

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use csv::WriterBuilder;
use persona_synth::{analyze_generation_quality, GeneratorConfig, Persona, PersonaGenerator};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

/// Hierarchical persona generator
#[derive(Parser, Debug)]
#[command(name = "generate_personas")]
#[command(about = "Generate demographically consistent personas")]
struct Args {
    /// Number of personas to generate
    #[arg(long, default_value = "1000")]
    count: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Census reference CSV
    #[arg(long)]
    reference_data: Option<PathBuf>,

    /// JSON generator config; flags override its seed and reference path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path
    #[arg(long, default_value = "data/personas.json")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Print a quality report
    #[arg(long)]
    analyze: bool,
}

fn write_json(path: &Path, personas: &[Persona]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, personas)?;
    Ok(())
}

fn write_csv(path: &Path, personas: &[Persona]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for persona in personas {
        writer.serialize(persona.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if args.seed.is_some() {
        config = config.with_seed(args.seed);
    }
    if args.reference_data.is_some() {
        config = config.with_reference_data(args.reference_data.clone());
    }

    println!("👥 Persona Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Count:            {}", args.count);
    println!("Output:           {} ({:?})", args.output.display(), args.format);
    println!("Max attempts:     {}", config.max_attempts);
    match &config.reference_data {
        Some(path) => println!("Reference data:   {}", path.display()),
        None => println!("Reference data:   none (default distributions)"),
    }
    if let Some(seed) = config.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    let mut rng = config.rng();
    let generator = PersonaGenerator::new(config)?;

    // Ensure output directory exists
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("🏭 Generating personas...");
    let (personas, summary) = generator.generate_many_with_log(args.count, &mut rng);

    match args.format {
        Format::Json => write_json(&args.output, &personas)?,
        Format::Csv => write_csv(&args.output, &personas)?,
    }
    info!("Wrote {} personas to {}", personas.len(), args.output.display());

    println!("\n✅ Complete!");
    println!("   Personas:       {}", summary.total);
    println!("   First attempt:  {}", summary.accepted_first_try);
    println!("   Retried:        {}", summary.retried);
    println!("   Fallback:       {}", summary.fallbacks);

    if args.analyze {
        let report = analyze_generation_quality(&personas);
        println!("\n📊 Quality report");
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
