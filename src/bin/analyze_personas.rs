//! Persona batch analytics
//! Summary statistics, distributions and validation results
//!
//! Run: ./target/release/analyze_personas <personas.json> [section]
//! Sections: all, summary, distribution, validation

use anyhow::{bail, Context, Result};
use persona_synth::quality::QualityReport;
use persona_synth::{analyze_generation_quality, Persona};
use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::BufReader;

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn print_subsection(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(70));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        bail!("usage: analyze_personas <personas.json> [all|summary|distribution|validation]");
    };
    let section = args.get(2).map(|s| s.as_str()).unwrap_or("all");

    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    let personas: Vec<Persona> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {path}"))?;
    let report = analyze_generation_quality(&personas);

    println!("\n👥 PERSONA BATCH ANALYTICS");
    println!("   {} personas from {}", report.total_personas, path);

    match section {
        "summary" => run_summary_section(&report),
        "distribution" => run_distribution_section(&report),
        "validation" => run_validation_section(&report, &personas),
        _ => {
            run_summary_section(&report);
            run_distribution_section(&report);
            run_validation_section(&report, &personas);
        }
    }

    Ok(())
}

fn run_summary_section(report: &QualityReport) {
    print_section_header("📊 SUMMARY STATISTICS");

    println!("{:<12} {:>14} {:>14} {:>14} {:>14}", "Metric", "Mean", "Std", "Min", "Max");
    println!("{}", "─".repeat(70));
    for (name, stats) in [("Age", &report.age_stats), ("Income", &report.income_stats)] {
        println!(
            "{:<12} {:>14.1} {:>14.1} {:>14.0} {:>14.0}",
            name, stats.mean, stats.std, stats.min, stats.max
        );
    }

    println!("\nQuality score: {:.1} / 100", report.quality_score);
}

fn print_distribution(title: &str, counts: &BTreeMap<String, usize>, total: usize) {
    print_subsection(title);
    let mut rows: Vec<(&String, &usize)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1));
    for (label, count) in rows {
        let pct = *count as f64 / total.max(1) as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("{:<24} {:>7} {:>6.1}% {}", label, count, pct, bar);
    }
}

fn run_distribution_section(report: &QualityReport) {
    print_section_header("📈 DISTRIBUTIONS");
    let total = report.total_personas;
    let d = &report.distributions;
    print_distribution("Gender", &d.gender, total);
    print_distribution("Education", &d.education, total);
    print_distribution("Marital status", &d.marital_status, total);
    print_distribution("Occupation", &d.occupation, total);
    print_distribution("Location", &d.location, total);
}

fn run_validation_section(report: &QualityReport, personas: &[Persona]) {
    print_section_header("✅ VALIDATION");

    let fallbacks = personas
        .iter()
        .filter(|p| p.generation_attempt.is_fallback())
        .count();
    println!("Validation errors: {}", report.validation_errors);
    println!("Fallback personas: {}", fallbacks);

    if !report.error_samples.is_empty() {
        print_subsection("First errors");
        for error in &report.error_samples {
            println!("  • {}", error);
        }
    }
}
