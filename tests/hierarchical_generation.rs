//! End-to-end checks of the hierarchical generator

mod common;

use persona_synth::models::occupations::{CREDENTIALED, PART_TIME, STUDENT, UNIVERSITY_STUDENT};
use persona_synth::reference::{CsvReference, ReferenceStatsProvider};
use persona_synth::regions::RegionSampler;
use persona_synth::{
    get_age_group_constraints, EducationLevel, Error, Gender, GenerationAttempt, GeneratorConfig,
    MaritalStatus, Persona, PersonaGenerator,
};
use std::collections::HashMap;

#[test]
fn test_thousand_personas_are_all_valid() {
    let generator = common::default_generator();
    let mut rng = common::rng(2024);
    let personas = generator.generate_many(1000, &mut rng);
    assert_eq!(personas.len(), 1000);

    for persona in &personas {
        let report = generator.validate_persona(persona);
        assert!(report.is_valid(), "{:?}: {:?}", persona, report.errors());
    }
}

#[test]
fn test_age_rules_hold_across_batch() {
    let generator = common::default_generator();
    let mut rng = common::rng(7);

    for persona in generator.generate_many(1000, &mut rng) {
        assert!(persona.age >= 15);
        if persona.age < 18 {
            assert!(!persona.education.is_university_or_higher());
            assert_eq!(persona.marital_status, MaritalStatus::Single);
        }
        if persona.age < 22 {
            assert!(!persona.education.is_graduate());
        }
        if persona.age < 26 {
            assert_ne!(persona.education, EducationLevel::Doctorate);
        }
        if persona.age <= 19 {
            assert!(persona.occupation == STUDENT || persona.occupation == PART_TIME);
            assert!(persona.income <= 2_000_000);
        }
        if persona.occupation == STUDENT {
            assert!(persona.age <= 30);
            assert!(persona.income <= 1_000_000);
        }
    }
}

#[test]
fn test_credentialed_occupations_have_degrees() {
    let generator = common::default_generator();
    let mut rng = common::rng(99);

    for persona in generator.generate_many(1000, &mut rng) {
        if CREDENTIALED.contains(&persona.occupation.as_str()) {
            assert!(persona.education.is_university_or_higher(), "{:?}", persona);
        }
    }
}

#[test]
fn test_income_is_positive_and_within_band() {
    let generator = common::default_generator();
    let mut rng = common::rng(5);

    for persona in generator.generate_many(1000, &mut rng) {
        let band = get_age_group_constraints(persona.age).unwrap();
        assert!(persona.income > 0);
        assert!(band.admits_income(persona.income), "{:?}", persona);
    }
}

#[test]
fn test_location_distribution_matches_population() {
    let sampler = RegionSampler::new();
    let mut rng = common::rng(10_000);
    let draws = 10_000;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for _ in 0..draws {
        *counts.entry(sampler.sample(&mut rng)).or_insert(0) += 1;
    }

    let mut errors = Vec::new();
    for (region, expected) in sampler.expected_shares() {
        let actual = *counts.get(region).unwrap_or(&0) as f64 / draws as f64 * 100.0;
        let error = (actual - expected * 100.0).abs();
        assert!(error <= 3.0, "{region}: expected {:.1}% got {actual:.1}%", expected * 100.0);
        errors.push(error);
    }
    let mean_error = errors.iter().sum::<f64>() / errors.len() as f64;
    assert!(mean_error <= 2.0, "mean error {mean_error:.2}%");
}

#[test]
fn test_generated_locations_are_known_regions() {
    let generator = common::default_generator();
    let sampler = RegionSampler::new();
    let mut rng = common::rng(12);
    for persona in generator.generate_many(200, &mut rng) {
        assert!(sampler.contains(&persona.location), "{}", persona.location);
    }
}

#[test]
fn test_fallback_personas_are_valid() {
    let generator = common::default_generator();
    let mut rng = common::rng(20);

    for _ in 0..20 {
        let persona = generator.generate_fallback_persona(&mut rng);
        assert!((20..=45).contains(&persona.age));
        assert_eq!(persona.generation_attempt, GenerationAttempt::Fallback);
        assert!(generator.validate_persona(&persona).is_valid(), "{:?}", persona);
    }
}

#[test]
fn test_underage_persona_reports_multiple_errors() {
    let generator = common::default_generator();
    let persona = Persona {
        age: 13,
        gender: Gender::Female,
        education: EducationLevel::University,
        marital_status: MaritalStatus::Married,
        occupation: UNIVERSITY_STUDENT.to_string(),
        income: 500_000,
        location: "서울특별시".to_string(),
        generation_attempt: GenerationAttempt::Attempt(1),
    };

    let (is_valid, errors) = generator.validate_persona(&persona).into_parts();
    assert!(!is_valid);
    assert!(errors.len() >= 3, "{errors:?}");
}

#[test]
fn test_below_floor_lookup_fails() {
    assert!(matches!(
        get_age_group_constraints(13),
        Err(Error::UnsupportedAge { age: 13, .. })
    ));
}

#[test]
fn test_same_seed_same_personas() {
    let generator = common::default_generator();
    let a = generator.generate_many(100, &mut common::rng(77));
    let b = generator.generate_many(100, &mut common::rng(77));
    assert_eq!(a, b);

    let c = generator.generate_many(100, &mut common::rng(78));
    assert_ne!(a, c);
}

#[test]
fn test_reference_calibrated_generation() {
    let generator = common::reference_generator();
    assert!(generator.has_reference_data());
    let mut rng = common::rng(31);

    let personas = generator.generate_many(500, &mut rng);
    for persona in &personas {
        assert!(generator.validate_persona(persona).is_valid(), "{:?}", persona);
    }

    // The fixture has no teen beyond high school, so teens stay at MS/HS
    for persona in personas.iter().filter(|p| p.age < 20) {
        assert!(matches!(
            persona.education,
            EducationLevel::MiddleSchool | EducationLevel::HighSchool
        ));
    }
}

#[test]
fn test_euc_kr_reference_file_is_used() {
    let utf8 = std::fs::read_to_string(common::reference_fixture()).unwrap();
    let (encoded, _, unmappable) = encoding_rs::EUC_KR.encode(&utf8);
    assert!(!unmappable);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reference_euc_kr.csv");
    std::fs::write(&path, &encoded).unwrap();

    let from_euc_kr = CsvReference::try_load(&path).unwrap();
    let from_utf8 = CsvReference::try_load(common::reference_fixture()).unwrap();
    assert!(!from_euc_kr.is_empty());
    assert_eq!(
        from_euc_kr.age_bands().collect::<Vec<_>>(),
        from_utf8.age_bands().collect::<Vec<_>>()
    );

    let config = GeneratorConfig::default().with_reference_data(Some(path));
    let generator = PersonaGenerator::new(config).unwrap();
    assert!(generator.has_reference_data());
    let persona = generator.generate_persona(&mut common::rng(2));
    assert!(generator.validate_persona(&persona).is_valid());
}

#[test]
fn test_missing_reference_degrades_to_defaults() {
    let config = GeneratorConfig::default()
        .with_reference_data(Some(common::fixture_path("does_not_exist.csv")));
    let generator = PersonaGenerator::new(config).unwrap();
    assert!(!generator.has_reference_data());

    let mut rng = common::rng(1);
    let persona = generator.generate_persona(&mut rng);
    assert!(generator.validate_persona(&persona).is_valid());
}

#[test]
fn test_output_round_trips_through_json_file() {
    let generator = common::default_generator();
    let personas = generator.generate_many(25, &mut common::rng(3));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("personas.json");
    std::fs::write(&path, serde_json::to_string_pretty(&personas).unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let back: Vec<Persona> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, personas);
}
