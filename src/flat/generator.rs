//! Flat persona generator

use super::config::FlatConfig;
use super::trends;
use super::validator::{FlatValidation, FlatValidator};
use super::{AgeGroup, FlatEducation, Generation, IncomeBracket};
use crate::error::{Error, Result};
use crate::models::{Gender, MaritalStatus};
use crate::regions::get_region_short;
use chrono::NaiveDateTime;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

const FALLBACK_OCCUPATION: &str = "기타 직업";
const FALLBACK_MEDIA: &str = "기타 미디어";
const FALLBACK_SHOPPING: &str = "기타 소비";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatDemographics {
    pub age: u32,
    pub gender: Gender,
    /// Short region name, e.g. "서울"
    pub location: String,
    pub occupation: String,
    pub education: FlatEducation,
    pub income_bracket: IncomeBracket,
    pub marital_status: MaritalStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PsychologicalAttributes {
    /// Big Five trait → expression
    pub personality_traits: BTreeMap<String, String>,
    pub values: BTreeSet<String>,
    pub lifestyle_attributes: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehavioralPatterns {
    pub interests: BTreeSet<String>,
    pub media_consumption: String,
    pub shopping_habit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatPersona {
    pub id: String,
    pub name: String,
    pub demographics: FlatDemographics,
    pub psychological_attributes: PsychologicalAttributes,
    pub behavioral_patterns: BehavioralPatterns,
    pub social_relations: BTreeSet<String>,
    pub created_at: NaiveDateTime,
    pub version: u32,
}

/// Optional pins on the sampled demographics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlatConstraints {
    pub age_range: Option<(u32, u32)>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub education: Option<FlatEducation>,
    pub income_bracket: Option<IncomeBracket>,
    pub marital_status: Option<MaritalStatus>,
    /// Year whose demographic trends to use instead of the configured one
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlatGenerationStats {
    pub total_attempts: usize,
    pub successful_generations: usize,
    pub validation_failures: usize,
    pub warnings_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatBatch {
    pub personas: Vec<FlatPersona>,
    pub generation_stats: FlatGenerationStats,
    /// Percentage of requested personas that were produced
    pub success_rate: f64,
}

fn pick<T: Clone>(items: &[(T, f64)], rng: &mut impl Rng) -> Option<T> {
    let dist = WeightedIndex::new(items.iter().map(|(_, w)| *w)).ok()?;
    Some(items[dist.sample(rng)].0.clone())
}

/// Between `min` and `max` distinct items
fn sample_set(items: &[String], min: usize, max: usize, rng: &mut impl Rng) -> BTreeSet<String> {
    let hi = max.min(items.len());
    let lo = min.min(hi);
    let k = rng.gen_range(lo..=hi);
    items.choose_multiple(rng, k).cloned().collect()
}

fn choose_string(items: &[String], fallback: &str, rng: &mut impl Rng) -> String {
    items
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

pub struct FlatPersonaGenerator {
    config: FlatConfig,
    validator: FlatValidator,
}

impl FlatPersonaGenerator {
    pub fn new(config: FlatConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            validator: FlatValidator::new(),
        })
    }

    pub fn config(&self) -> &FlatConfig {
        &self.config
    }

    pub fn validator(&self) -> &FlatValidator {
        &self.validator
    }

    fn sample_age(
        &self,
        constraints: &FlatConstraints,
        year: Option<i32>,
        rng: &mut impl Rng,
    ) -> Result<u32> {
        if let Some((min, max)) = constraints.age_range {
            if min > max {
                return Err(Error::InvalidConfig(format!("age range {min}-{max} is empty")));
            }
            return Ok(rng.gen_range(min..=max));
        }

        let group: Option<AgeGroup> = match year {
            Some(year) => pick(&trends::year_data(year).age_distribution, rng),
            None => pick(&self.config.age_distribution, rng),
        };
        let group = group.ok_or(Error::EmptyDistribution { what: "age group" })?;
        Ok(rng.gen_range(group.min_age..=group.max_age))
    }

    fn sample_location(&self, year: Option<i32>, rng: &mut impl Rng) -> Result<String> {
        let location = match year {
            Some(year) => {
                pick(&trends::year_data(year).regional_distribution, rng).map(str::to_string)
            }
            None => pick(&self.config.regional_distribution, rng),
        };
        location.ok_or(Error::EmptyDistribution { what: "region" })
    }

    fn sample_education(&self, age: u32, rng: &mut impl Rng) -> Result<FlatEducation> {
        use FlatEducation as E;
        let by_age: &[(FlatEducation, f64)] = match age {
            0..=6 => &[(E::None, 1.0)],
            7..=12 => &[(E::None, 0.6), (E::Elementary, 0.4)],
            13..=15 => &[(E::Elementary, 0.8), (E::Middle, 0.2)],
            16..=18 => &[(E::Middle, 0.7), (E::High, 0.3)],
            19..=22 => &[(E::High, 0.6), (E::Bachelor, 0.4)],
            _ => &self.config.education_levels,
        };
        pick(by_age, rng).ok_or(Error::EmptyDistribution { what: "education" })
    }

    fn sample_occupation(&self, age: u32, rng: &mut impl Rng) -> String {
        let fixed = match age {
            0..=6 => Some("기타 무직"),
            7..=12 => Some("초등학생"),
            13..=15 => Some("중학생"),
            16..=18 => Some("고등학생"),
            19 => ["대학생", "고등학생"].choose(rng).copied(),
            _ => None,
        };
        if let Some(occupation) = fixed {
            return occupation.to_string();
        }

        let categories = if age >= 60 {
            &self.config.senior_categories
        } else {
            &self.config.working_age_categories
        };
        pick(categories, rng)
            .and_then(|category| self.config.occupations_in(&category))
            .and_then(|list| list.choose(rng).cloned())
            .unwrap_or_else(|| FALLBACK_OCCUPATION.to_string())
    }

    fn sample_demographics(
        &self,
        constraints: &FlatConstraints,
        rng: &mut impl Rng,
    ) -> Result<FlatDemographics> {
        let year = constraints.year.or(self.config.trend_year);

        let age = self.sample_age(constraints, year, rng)?;
        let gender = match constraints.gender {
            Some(g) => g,
            None => pick(&self.config.gender_ratio, rng)
                .ok_or(Error::EmptyDistribution { what: "gender" })?,
        };
        // Pinned regions may use full names; personas carry short ones
        let location = match &constraints.location {
            Some(l) => get_region_short(l).to_string(),
            None => self.sample_location(year, rng)?,
        };
        let education = match constraints.education {
            Some(e) => e,
            None => self.sample_education(age, rng)?,
        };
        let occupation = self.sample_occupation(age, rng);
        let income_bracket = match constraints.income_bracket {
            Some(b) => b,
            None if age <= 18 => IncomeBracket::Bottom20,
            None => pick(&self.config.income_brackets, rng)
                .ok_or(Error::EmptyDistribution { what: "income bracket" })?,
        };
        let marital_status = match constraints.marital_status {
            Some(m) => m,
            None => pick(&self.config.marital_statuses, rng)
                .ok_or(Error::EmptyDistribution { what: "marital status" })?,
        };

        Ok(FlatDemographics {
            age,
            gender,
            location,
            occupation,
            education,
            income_bracket,
            marital_status,
        })
    }

    fn sample_psychology(
        &self,
        demographics: &FlatDemographics,
        rng: &mut impl Rng,
    ) -> PsychologicalAttributes {
        let personality_traits = self
            .config
            .personality_traits
            .iter()
            .filter_map(|(trait_name, options)| {
                options.choose(rng).map(|v| (trait_name.clone(), v.clone()))
            })
            .collect();

        let mut values = sample_set(&self.config.values, 2, 5, rng);
        if let Some(generation) = Generation::for_age(demographics.age) {
            values.extend(self.config.values_for(generation).iter().cloned());
        }

        let mut lifestyle_attributes = sample_set(&self.config.lifestyle_attributes, 1, 3, rng);
        lifestyle_attributes.extend(
            self.config
                .traits_for_region(&demographics.location)
                .iter()
                .cloned(),
        );

        PsychologicalAttributes {
            personality_traits,
            values,
            lifestyle_attributes,
        }
    }

    fn sample_behavior(&self, rng: &mut impl Rng) -> BehavioralPatterns {
        BehavioralPatterns {
            interests: sample_set(&self.config.interests, 3, 6, rng),
            media_consumption: choose_string(&self.config.media_habits, FALLBACK_MEDIA, rng),
            shopping_habit: choose_string(&self.config.shopping_habits, FALLBACK_SHOPPING, rng),
        }
    }

    /// Assemble a persona without validating it
    pub fn generate_unvalidated(
        &self,
        constraints: &FlatConstraints,
        rng: &mut impl Rng,
    ) -> Result<FlatPersona> {
        let demographics = self.sample_demographics(constraints, rng)?;
        let psychological_attributes = self.sample_psychology(&demographics, rng);
        let behavioral_patterns = self.sample_behavior(rng);
        let social_relations = sample_set(&self.config.social_relations, 1, 3, rng);

        let id = rng.gen_range(100_000_000u32..=999_999_999).to_string();
        Ok(FlatPersona {
            name: format!("가상인물_{id}"),
            id,
            demographics,
            psychological_attributes,
            behavioral_patterns,
            social_relations,
            created_at: chrono::Local::now().naive_local(),
            version: 1,
        })
    }

    fn generate_validated(
        &self,
        constraints: &FlatConstraints,
        rng: &mut impl Rng,
    ) -> Result<(FlatPersona, FlatValidation)> {
        let max_retries = self.config.max_retries;
        let mut last_errors = Vec::new();

        for attempt in 1..=max_retries {
            let persona = self.generate_unvalidated(constraints, rng)?;
            let validation = self.validator.validate(&persona.demographics);

            if validation.is_valid {
                if !validation.warnings.is_empty() {
                    warn!("Persona {} warnings: {:?}", persona.id, validation.warnings);
                }
                return Ok((persona, validation));
            }

            debug!(
                "Persona attempt {}/{} failed: {:?}",
                attempt, max_retries, validation.errors
            );
            last_errors = validation.errors;
        }

        warn!("No valid persona after {} attempts: {:?}", max_retries, last_errors);
        Err(Error::GenerationExhausted {
            attempts: max_retries,
            last_errors,
        })
    }

    /// Generate one persona that passes the flat validator
    pub fn generate_persona(
        &self,
        constraints: &FlatConstraints,
        rng: &mut impl Rng,
    ) -> Result<FlatPersona> {
        self.generate_validated(constraints, rng).map(|(persona, _)| persona)
    }

    /// Generate up to `count` personas; failures are counted, not returned
    pub fn generate_personas(
        &self,
        count: usize,
        constraints: &FlatConstraints,
        rng: &mut impl Rng,
    ) -> FlatBatch {
        let mut personas = Vec::with_capacity(count);
        let mut stats = FlatGenerationStats::default();

        for i in 0..count {
            match self.generate_validated(constraints, rng) {
                Ok((persona, validation)) => {
                    if !validation.warnings.is_empty() {
                        stats.warnings_count += 1;
                    }
                    stats.successful_generations += 1;
                    personas.push(persona);
                }
                Err(e) => {
                    warn!("Persona {} failed: {}", i + 1, e);
                    stats.validation_failures += 1;
                }
            }
        }

        stats.total_attempts = stats.successful_generations + stats.validation_failures;
        let success_rate =
            stats.successful_generations as f64 / stats.total_attempts.max(1) as f64 * 100.0;

        info!(
            "Generated {}/{} flat personas ({:.1}% success, {} with warnings)",
            stats.successful_generations, count, success_rate, stats.warnings_count
        );

        FlatBatch {
            personas,
            generation_stats: stats,
            success_rate,
        }
    }
}
