use anyhow::Result;
use persona_synth::{
    analyze_generation_quality, get_age_group_constraints, GeneratorConfig, PersonaGenerator,
};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let config = GeneratorConfig::default().with_seed(Some(42));
    let mut rng = config.rng();
    let generator = PersonaGenerator::new(config)?;

    info!("=== Age Band Constraints ===");
    for age in [17, 22, 27, 35, 45, 55, 70] {
        let band = get_age_group_constraints(age)?;
        info!(
            "age {}: band {}-{}, education {:?}, marital {:?}, income {}-{}",
            age,
            band.min_age,
            band.max_age,
            band.valid_education_levels,
            band.valid_marital_statuses,
            band.min_income,
            band.max_income
        );
    }

    info!("=== Single Persona ===");
    let persona = generator.generate_persona(&mut rng);
    info!("{}", serde_json::to_string_pretty(&persona)?);

    info!("=== Batch of 100 ===");
    let (personas, summary) = generator.generate_many_with_log(100, &mut rng);
    info!("Summary: {:?}", summary);

    let report = analyze_generation_quality(&personas);
    info!(
        "Quality score {:.1}, mean age {:.1}, mean income {:.0}",
        report.quality_score, report.age_stats.mean, report.income_stats.mean
    );

    Ok(())
}
