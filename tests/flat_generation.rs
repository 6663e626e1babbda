//! End-to-end checks of the flat generator

mod common;

use persona_synth::flat::trends;
use persona_synth::flat::{
    FlatConfig, FlatConstraints, FlatPersona, FlatPersonaGenerator, IncomeBracket,
};
use persona_synth::{Error, MaritalStatus};

fn generator() -> FlatPersonaGenerator {
    FlatPersonaGenerator::new(FlatConfig::default()).unwrap()
}

#[test]
fn test_batch_personas_pass_flat_validation() {
    let gen = generator();
    let mut rng = common::rng(2024);
    let batch = gen.generate_personas(200, &FlatConstraints::default(), &mut rng);

    assert_eq!(batch.generation_stats.total_attempts, 200);
    assert!(batch.success_rate >= 95.0, "success rate {}", batch.success_rate);
    for persona in &batch.personas {
        let result = gen.validator().validate(&persona.demographics);
        assert!(result.is_valid, "{:?}", result.errors);
        if persona.demographics.age <= 18 {
            assert_eq!(persona.demographics.income_bracket, IncomeBracket::Bottom20);
        }
    }
}

#[test]
fn test_office_workers_are_generated() {
    let gen = generator();
    let mut rng = common::rng(7);
    let batch = gen.generate_personas(300, &FlatConstraints::default(), &mut rng);

    let office_workers = batch
        .personas
        .iter()
        .filter(|p| p.demographics.occupation == "사무직")
        .count();
    assert!(office_workers > 0, "no 사무직 in {} personas", batch.personas.len());
}

#[test]
fn test_projected_year_constraint() {
    let gen = generator();
    let mut rng = common::rng(8);
    let constraints = FlatConstraints {
        year: Some(2030),
        ..Default::default()
    };
    let batch = gen.generate_personas(50, &constraints, &mut rng);
    assert!(!batch.personas.is_empty());

    let regions: Vec<&str> = trends::REGIONS.to_vec();
    for persona in &batch.personas {
        assert!(regions.contains(&persona.demographics.location.as_str()));
    }
}

#[test]
fn test_config_distributions_without_trends() {
    let config = FlatConfig {
        trend_year: None,
        regional_distribution: vec![("제주".to_string(), 1.0)],
        ..Default::default()
    };
    let gen = FlatPersonaGenerator::new(config).unwrap();
    let mut rng = common::rng(4);
    let persona = gen.generate_persona(&FlatConstraints::default(), &mut rng).unwrap();
    assert_eq!(persona.demographics.location, "제주");
    assert!(persona
        .psychological_attributes
        .lifestyle_attributes
        .contains("자연친화적"));
}

#[test]
fn test_exhaustion_is_an_error() {
    let config = FlatConfig {
        max_retries: 3,
        ..Default::default()
    };
    let gen = FlatPersonaGenerator::new(config).unwrap();
    let mut rng = common::rng(6);
    let constraints = FlatConstraints {
        age_range: Some((5, 5)),
        marital_status: Some(MaritalStatus::Widowed),
        ..Default::default()
    };
    match gen.generate_persona(&constraints, &mut rng) {
        Err(Error::GenerationExhausted { attempts, last_errors }) => {
            assert_eq!(attempts, 3);
            assert!(!last_errors.is_empty());
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[test]
fn test_flat_persona_json_shape() {
    let gen = generator();
    let mut rng = common::rng(15);
    let persona = gen.generate_persona(&FlatConstraints::default(), &mut rng).unwrap();

    let json = serde_json::to_value(&persona).unwrap();
    assert!(json["demographics"]["age"].is_u64());
    assert!(json["psychological_attributes"]["values"].is_array());
    assert!(json["behavioral_patterns"]["media_consumption"].is_string());
    assert_eq!(json["version"], 1);

    let back: FlatPersona = serde_json::from_value(json).unwrap();
    assert_eq!(back, persona);
}

#[test]
fn test_config_file_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.json");
    std::fs::write(&path, r#"{"max_retries": 4, "trend_year": 2021}"#).unwrap();

    let config = FlatConfig::from_json_file(&path).unwrap();
    assert_eq!(config.max_retries, 4);
    assert_eq!(config.trend_year, Some(2021));
    assert_eq!(config.values.len(), 10);
}
