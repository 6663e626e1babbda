//! Property tests for validator and sampler invariants

mod common;

use persona_synth::models::occupations::STUDENT;
use persona_synth::{
    validate_persona, ConstraintTable, EducationLevel, Gender, GenerationAttempt, MaritalStatus,
    Persona,
};
use proptest::prelude::*;

fn education() -> impl Strategy<Value = EducationLevel> {
    prop::sample::select(EducationLevel::ALL.to_vec())
}

fn marital() -> impl Strategy<Value = MaritalStatus> {
    prop::sample::select(MaritalStatus::ALL.to_vec())
}

fn occupation() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "학생", "아르바이트", "사무직", "의사", "교수", "판사", "서비스직", "무직", "은퇴", "대학생",
    ])
    .prop_map(str::to_string)
}

prop_compose! {
    fn any_persona()(
        age in 0u32..110,
        education in education(),
        marital_status in marital(),
        occupation in occupation(),
        income in 0u64..25_000_000,
    ) -> Persona {
        Persona {
            age,
            gender: Gender::Male,
            education,
            marital_status,
            occupation,
            income,
            location: "대전광역시".to_string(),
            generation_attempt: GenerationAttempt::Attempt(1),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn valid_personas_satisfy_age_rules(persona in any_persona()) {
        let table = ConstraintTable::standard();
        let report = validate_persona(&table, &persona);

        prop_assert_eq!(report.is_valid(), report.errors().is_empty());
        if report.is_valid() {
            prop_assert!(persona.age >= 15);
            let band = table.get_constraints(persona.age).unwrap();
            prop_assert!(band.admits_education(persona.education));
            prop_assert!(band.admits_marital_status(persona.marital_status));
            prop_assert!(band.admits_income(persona.income));
            if persona.age < 18 {
                prop_assert!(!persona.education.is_university_or_higher());
            }
            if persona.occupation == STUDENT {
                prop_assert!(persona.income <= 1_000_000);
            }
        }
    }

    #[test]
    fn below_floor_is_never_valid(persona in any_persona(), age in 0u32..15) {
        let table = ConstraintTable::standard();
        let persona = Persona { age, ..persona };
        let report = validate_persona(&table, &persona);
        prop_assert!(!report.is_valid());
        prop_assert!(!report.errors().is_empty());
    }

    #[test]
    fn generated_personas_are_valid_for_any_seed(seed in any::<u64>()) {
        let generator = common::default_generator();
        let mut rng = common::rng(seed);
        let persona = generator.generate_persona(&mut rng);
        prop_assert!(generator.validate_persona(&persona).is_valid());
        prop_assert!(persona.income > 0);
    }

    #[test]
    fn fallback_is_valid_for_any_seed(seed in any::<u64>()) {
        let generator = common::default_generator();
        let mut rng = common::rng(seed);
        let persona = generator.generate_fallback_persona(&mut rng);
        prop_assert!((20..=45).contains(&persona.age));
        prop_assert!(generator.validate_persona(&persona).is_valid());
    }
}
