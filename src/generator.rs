//! Hierarchical persona generator
//!
//! Each attempt samples attributes in dependency order and validates the
//! candidate. Failed attempts are recorded and retried up to
//! `max_attempts`; after that a conservative fallback persona is built.

use crate::config::GeneratorConfig;
use crate::constraints::{AgeBandConstraint, ConstraintTable};
use crate::error::{Error, Result};
use crate::models::occupations::{ENGINEER, NURSE, OFFICE_WORKER, TEACHER};
use crate::models::{EducationLevel, GenerationAttempt, MaritalStatus, Persona};
use crate::reference::{CsvReference, NoReference, ReferenceStatsProvider};
use crate::regions::RegionSampler;
use crate::sampling::AttributeSampler;
use crate::validator::{self, ValidationReport, Violation};
use rand::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Occupations the fallback path draws from
const FALLBACK_OCCUPATIONS: [&str; 4] = [OFFICE_WORKER, ENGINEER, TEACHER, NURSE];
/// Education levels the fallback path draws from
const FALLBACK_EDUCATION: [EducationLevel; 2] =
    [EducationLevel::HighSchool, EducationLevel::University];

/// Why one attempt did not produce a persona
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("sampling failed: {0}")]
    Sampling(#[source] Error),
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<Violation>),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Counts of how a batch was produced
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted_first_try: usize,
    pub retried: usize,
    pub fallbacks: usize,
}

impl BatchSummary {
    fn record(&mut self, attempt: GenerationAttempt) {
        self.total += 1;
        match attempt {
            GenerationAttempt::Attempt(1) => self.accepted_first_try += 1,
            GenerationAttempt::Attempt(_) => self.retried += 1,
            GenerationAttempt::Fallback => self.fallbacks += 1,
        }
    }
}

pub struct PersonaGenerator {
    config: GeneratorConfig,
    table: ConstraintTable,
    reference: Box<dyn ReferenceStatsProvider>,
    regions: RegionSampler,
}

impl PersonaGenerator {
    /// Build a generator, loading reference statistics if a path is configured
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let reference: Box<dyn ReferenceStatsProvider> = match &config.reference_data {
            Some(path) => Box::new(CsvReference::load(path)),
            None => Box::new(NoReference),
        };
        Self::with_reference(config, reference)
    }

    /// Build a generator around an already-loaded reference provider
    pub fn with_reference(
        config: GeneratorConfig,
        reference: Box<dyn ReferenceStatsProvider>,
    ) -> Result<Self> {
        config.validate()?;
        if reference.is_empty() {
            debug!("No reference statistics, samplers use default distributions");
        }
        Ok(Self {
            config,
            table: ConstraintTable::standard(),
            reference,
            regions: RegionSampler::new(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn has_reference_data(&self) -> bool {
        !self.reference.is_empty()
    }

    fn sampler(&self) -> AttributeSampler<'_> {
        AttributeSampler {
            table: &self.table,
            reference: self.reference.as_ref(),
            regions: &self.regions,
            age: &self.config.age,
        }
    }

    /// Constraints for the band containing `age`
    pub fn get_age_group_constraints(&self, age: u32) -> Result<&AgeBandConstraint> {
        self.table.get_constraints(age)
    }

    pub fn validate_persona(&self, persona: &Persona) -> ValidationReport {
        validator::validate_persona(&self.table, persona)
    }

    /// Sample one candidate without validating it
    fn sample_candidate(&self, attempt: u32, rng: &mut impl Rng) -> Result<Persona> {
        let sampler = self.sampler();

        let age = sampler.sample_age(rng);
        let gender = sampler.sample_gender(rng);
        let education = sampler.sample_education(age, gender, rng)?;
        let marital_status = sampler.sample_marital_status(age, gender, rng)?;
        let occupation = sampler.sample_occupation(education, age, rng)?;
        let income = sampler.sample_income(education, &occupation, age, rng)?;
        let location = sampler.sample_location(rng);

        Ok(Persona {
            age,
            gender,
            education,
            marital_status,
            occupation,
            income,
            location,
            generation_attempt: GenerationAttempt::Attempt(attempt),
        })
    }

    fn try_attempt(
        &self,
        attempt: u32,
        rng: &mut impl Rng,
    ) -> std::result::Result<Persona, AttemptFailure> {
        let candidate = self
            .sample_candidate(attempt, rng)
            .map_err(AttemptFailure::Sampling)?;

        let report = self.validate_persona(&candidate);
        if report.is_valid() {
            Ok(candidate)
        } else {
            Err(AttemptFailure::Validation(report.violations))
        }
    }

    /// Generate a persona together with the failures that preceded it
    pub fn generate_persona_traced(&self, rng: &mut impl Rng) -> (Persona, Vec<AttemptFailure>) {
        let mut failures = Vec::new();

        for attempt in 1..=self.config.max_attempts {
            match self.try_attempt(attempt, rng) {
                Ok(persona) => return (persona, failures),
                Err(failure) => {
                    debug!("Attempt {} rejected: {}", attempt, failure);
                    failures.push(failure);
                }
            }
        }

        warn!(
            "No valid persona after {} attempts, using fallback",
            self.config.max_attempts
        );
        (self.generate_fallback_persona(rng), failures)
    }

    /// Generate one valid persona
    pub fn generate_persona(&self, rng: &mut impl Rng) -> Persona {
        self.generate_persona_traced(rng).0
    }

    /// Conservative persona that passes validation by construction
    pub fn generate_fallback_persona(&self, rng: &mut impl Rng) -> Persona {
        let (lo, hi) = self.config.fallback_age_range;
        let age = rng.gen_range(lo..=hi);
        let band = self.table.get_constraints(age).ok();

        let education_options: Vec<EducationLevel> = FALLBACK_EDUCATION
            .into_iter()
            .filter(|e| band.map_or(true, |b| b.admits_education(*e)))
            .collect();
        let education = education_options
            .choose(rng)
            .copied()
            .unwrap_or(EducationLevel::HighSchool);

        let marital_status = band
            .and_then(|b| b.valid_marital_statuses.choose(rng).copied())
            .unwrap_or(MaritalStatus::Single);

        let occupation_options: Vec<&str> = FALLBACK_OCCUPATIONS
            .into_iter()
            .filter(|occ| {
                self.table
                    .required_education(occ)
                    .map_or(true, |levels| levels.contains(&education))
            })
            .collect();
        let occupation = occupation_options.choose(rng).copied().unwrap_or(OFFICE_WORKER);

        let sampler = self.sampler();
        let income = sampler
            .sample_income(education, occupation, age, rng)
            .unwrap_or_else(|_| band.map_or(1, |b| b.min_income.max(1)));

        Persona {
            age,
            gender: sampler.sample_gender(rng),
            education,
            marital_status,
            occupation: occupation.to_string(),
            income,
            location: sampler.sample_location(rng),
            generation_attempt: GenerationAttempt::Fallback,
        }
    }

    /// Generate `count` personas sequentially
    pub fn generate_many(&self, count: usize, rng: &mut impl Rng) -> Vec<Persona> {
        self.generate_many_with_log(count, rng).0
    }

    /// Generate `count` personas and report how they were produced
    pub fn generate_many_with_log(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> (Vec<Persona>, BatchSummary) {
        let mut personas = Vec::with_capacity(count);
        let mut summary = BatchSummary::default();

        for i in 0..count {
            let persona = self.generate_persona(rng);
            summary.record(persona.generation_attempt);
            personas.push(persona);

            if (i + 1) % 100 == 0 {
                info!("Generated {}/{} personas", i + 1, count);
            }
        }

        info!(
            "Generated {} personas ({} first try, {} retried, {} fallback)",
            summary.total, summary.accepted_first_try, summary.retried, summary.fallbacks
        );
        (personas, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn generator() -> PersonaGenerator {
        PersonaGenerator::new(GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_generated_persona_is_valid() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let persona = gen.generate_persona(&mut rng);
            let report = gen.validate_persona(&persona);
            assert!(report.is_valid(), "{:?}: {:?}", persona, report.errors());
        }
    }

    #[test]
    fn test_fallback_is_valid() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let persona = gen.generate_fallback_persona(&mut rng);
            assert!((20..=45).contains(&persona.age));
            assert!(persona.generation_attempt.is_fallback());
            assert!(gen.validate_persona(&persona).is_valid(), "{:?}", persona);
        }
    }

    #[test]
    fn test_single_attempt_falls_back_on_rejection() {
        let config = GeneratorConfig {
            max_attempts: 1,
            ..Default::default()
        };
        let gen = PersonaGenerator::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let (persona, failures) = gen.generate_persona_traced(&mut rng);
            match persona.generation_attempt {
                GenerationAttempt::Attempt(n) => {
                    assert_eq!(n, 1);
                    assert!(failures.is_empty());
                }
                GenerationAttempt::Fallback => assert_eq!(failures.len(), 1),
            }
        }
    }

    #[test]
    fn test_batch_summary_adds_up() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(11);
        let (personas, summary) = gen.generate_many_with_log(150, &mut rng);
        assert_eq!(personas.len(), 150);
        assert_eq!(summary.total, 150);
        assert_eq!(
            summary.accepted_first_try + summary.retried + summary.fallbacks,
            150
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GeneratorConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(PersonaGenerator::new(config).is_err());
    }

    #[test]
    fn test_attempt_failure_message() {
        let failure = AttemptFailure::Validation(vec![
            Violation::StudentTooOld { age: 40 },
            Violation::StudentIncome { income: 2_000_000 },
        ]);
        let message = failure.to_string();
        assert!(message.starts_with("validation failed: "));
        assert!(message.contains("; "));
    }
}
