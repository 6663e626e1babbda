//! Per-attribute samplers
//!
//! Each sampler depends only on attributes decided before it (age and
//! gender, then education and marital status, then occupation, then income)
//! plus the constraint table and, where present, the census reference.

use crate::config::AgeSampling;
use crate::constraints::ConstraintTable;
use crate::error::{Error, Result};
use crate::models::occupations::*;
use crate::models::{EducationLevel, Gender, MaritalStatus};
use crate::reference::ReferenceStatsProvider;
use crate::regions::RegionSampler;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::{LogNormal, Normal};

/// Income multipliers for occupations that deviate from the norm
const OCCUPATION_MULTIPLIERS: &[(&str, f64)] = &[
    ("의사", 3.0),
    ("변호사", 2.5),
    ("교수", 2.0),
    ("임원", 2.8),
    ("연구원", 1.5),
    ("엔지니어", 1.3),
    ("프로그래머", 1.4),
    ("교사", 1.1),
    ("간호사", 1.2),
    ("회계사", 1.3),
    ("사원", 0.8),
    ("사무직", 0.9),
    ("서비스직", 0.7),
    ("학생", 0.1),
    ("무직", 0.2),
    ("아르바이트", 0.3),
];

/// Weighted choice over `(value, weight)` pairs; zero weights never win
pub fn weighted_choice<T: Copy>(
    items: &[(T, f64)],
    rng: &mut impl Rng,
    what: &'static str,
) -> Result<T> {
    let dist = WeightedIndex::new(items.iter().map(|(_, w)| *w))
        .map_err(|_| Error::EmptyDistribution { what })?;
    Ok(items[dist.sample(rng)].0)
}

/// Uniform choice from a slice
pub fn uniform_choice<T: Copy>(items: &[T], rng: &mut impl Rng, what: &'static str) -> Result<T> {
    items
        .choose(rng)
        .copied()
        .ok_or(Error::EmptyDistribution { what })
}

fn default_education_weight(level: EducationLevel, age: u32) -> f64 {
    let older = age >= 50;
    match level {
        EducationLevel::MiddleSchool => if older { 0.15 } else { 0.05 },
        EducationLevel::HighSchool => if older { 0.45 } else { 0.30 },
        EducationLevel::College => 0.20,
        EducationLevel::University => if older { 0.25 } else { 0.35 },
        EducationLevel::Master => if older { 0.10 } else { 0.08 },
        EducationLevel::Doctorate => if older { 0.05 } else { 0.02 },
    }
}

fn default_marital_weight(status: MaritalStatus) -> f64 {
    match status {
        MaritalStatus::Single => 0.10,
        MaritalStatus::Married => 0.80,
        MaritalStatus::Divorced => 0.08,
        MaritalStatus::Widowed => 0.02,
    }
}

/// Occupations that never fail the education requirement check
fn safe_occupations(education: EducationLevel) -> &'static [&'static str] {
    match education {
        EducationLevel::MiddleSchool => &["서비스직", "자영업"],
        EducationLevel::HighSchool => &["사무직", "서비스직", "영업사원"],
        EducationLevel::College => &["사무직", "엔지니어", "간호사"],
        EducationLevel::University => &["사무직", "엔지니어", "교사"],
        EducationLevel::Master => &["연구원", "교사", "전문직"],
        EducationLevel::Doctorate => &["교수", "연구원", "전문직"],
    }
}

/// Income scaling by career stage, peaking in the forties
fn age_income_multiplier(age: u32) -> f64 {
    match age {
        0..=24 => 0.6,
        25..=29 => 0.8,
        30..=39 => 1.2,
        40..=49 => 1.5,
        50..=59 => 1.3,
        _ => 0.8,
    }
}

fn occupation_income_multiplier(occupation: &str) -> f64 {
    OCCUPATION_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == occupation)
        .map(|(_, m)| *m)
        .unwrap_or(1.0)
}

/// Samplers bound to one generator's tables
pub struct AttributeSampler<'a> {
    pub table: &'a ConstraintTable,
    pub reference: &'a dyn ReferenceStatsProvider,
    pub regions: &'a RegionSampler,
    pub age: &'a AgeSampling,
}

impl<'a> AttributeSampler<'a> {
    /// Adult-skewed age from a truncated normal
    pub fn sample_age(&self, rng: &mut impl Rng) -> u32 {
        let AgeSampling {
            mean,
            std_dev,
            min_age,
            max_age,
            max_draws,
            uniform_fallback,
        } = *self.age;

        if let Ok(normal) = Normal::new(mean, std_dev) {
            for _ in 0..max_draws {
                // Truncate toward zero like an integer cast of the draw
                let age = normal.sample(rng).trunc();
                if age >= min_age as f64 && age <= max_age as f64 {
                    return age as u32;
                }
            }
        }

        let lo = uniform_fallback.0.max(min_age);
        let hi = uniform_fallback.1.min(max_age);
        if lo <= hi {
            rng.gen_range(lo..=hi)
        } else {
            rng.gen_range(min_age..=max_age.max(min_age))
        }
    }

    pub fn sample_gender(&self, rng: &mut impl Rng) -> Gender {
        if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn sample_education(
        &self,
        age: u32,
        gender: Gender,
        rng: &mut impl Rng,
    ) -> Result<EducationLevel> {
        let constraints = self.table.get_constraints(age)?;
        let admissible = &constraints.valid_education_levels;

        if let Some(counts) = self.reference.education_weights(constraints.band(), gender) {
            let weighted: Vec<(EducationLevel, f64)> = EducationLevel::ALL
                .into_iter()
                .filter(|level| admissible.contains(level))
                .map(|level| (level, counts[level.index()] as f64))
                .filter(|(_, w)| *w > 0.0)
                .collect();
            if !weighted.is_empty() {
                return weighted_choice(&weighted, rng, "reference education");
            }
        }

        let tier: &[EducationLevel] = if age < 20 {
            &[EducationLevel::MiddleSchool, EducationLevel::HighSchool]
        } else if age < 25 {
            &[
                EducationLevel::HighSchool,
                EducationLevel::College,
                EducationLevel::University,
            ]
        } else {
            let weighted: Vec<(EducationLevel, f64)> = admissible
                .iter()
                .map(|level| (*level, default_education_weight(*level, age)))
                .collect();
            return weighted_choice(&weighted, rng, "default education");
        };

        let candidates: Vec<EducationLevel> = tier
            .iter()
            .copied()
            .filter(|level| admissible.contains(level))
            .collect();
        uniform_choice(&candidates, rng, "default education")
    }

    pub fn sample_marital_status(
        &self,
        age: u32,
        gender: Gender,
        rng: &mut impl Rng,
    ) -> Result<MaritalStatus> {
        let constraints = self.table.get_constraints(age)?;
        let admissible = &constraints.valid_marital_statuses;

        if let Some(totals) = self.reference.marital_weights(constraints.band(), gender) {
            let weighted: Vec<(MaritalStatus, f64)> = admissible
                .iter()
                .map(|status| {
                    let w = totals
                        .iter()
                        .find(|(s, _)| s == status)
                        .map(|(_, n)| *n as f64)
                        .unwrap_or(0.0);
                    (*status, w)
                })
                .collect();
            if weighted.iter().any(|(_, w)| *w > 0.0) {
                return weighted_choice(&weighted, rng, "reference marital status");
            }
        }

        let weighted: Vec<(MaritalStatus, f64)> = if age < 25 {
            vec![(MaritalStatus::Single, 1.0)]
        } else if age < 30 {
            vec![(MaritalStatus::Single, 0.6), (MaritalStatus::Married, 0.4)]
        } else if age < 35 {
            vec![(MaritalStatus::Single, 0.3), (MaritalStatus::Married, 0.7)]
        } else {
            admissible
                .iter()
                .map(|status| (*status, default_marital_weight(*status)))
                .collect()
        };

        let restricted: Vec<(MaritalStatus, f64)> = weighted
            .into_iter()
            .filter(|(status, _)| admissible.contains(status))
            .collect();
        if restricted.is_empty() {
            return uniform_choice(admissible, rng, "admissible marital status");
        }
        weighted_choice(&restricted, rng, "default marital status")
    }

    pub fn sample_occupation(
        &self,
        education: EducationLevel,
        age: u32,
        rng: &mut impl Rng,
    ) -> Result<String> {
        let constraints = self.table.get_constraints(age)?;

        // Forced outcomes for school-age personas
        if age <= 19 {
            if education == EducationLevel::HighSchool && age >= 18 {
                let occupation = uniform_choice(&[STUDENT, PART_TIME], rng, "teen occupation")?;
                return Ok(occupation.to_string());
            }
            return Ok(STUDENT.to_string());
        }
        if age <= 22 && matches!(education, EducationLevel::University | EducationLevel::College) {
            return Ok(uniform_choice(&[STUDENT, INTERN], rng, "student occupation")?.to_string());
        }

        if age >= 60 {
            return Ok(
                uniform_choice(&[RETIRED, UNEMPLOYED, SELF_EMPLOYED], rng, "senior occupation")?
                    .to_string(),
            );
        }

        let categories = &constraints.occupation_categories;
        let compatible: Vec<&'static str> = self
            .table
            .occupation_requirements()
            .iter()
            .filter(|(_, required)| required.contains(&education))
            .map(|(occupation, _)| *occupation)
            .filter(|occupation| {
                categories
                    .iter()
                    .any(|c| occupation.contains(c) || c.contains(occupation))
            })
            .collect();

        if !compatible.is_empty() {
            return Ok(uniform_choice(&compatible, rng, "compatible occupation")?.to_string());
        }

        Ok(uniform_choice(safe_occupations(education), rng, "safe occupation")?.to_string())
    }

    /// Log-normal income inside the band's range
    pub fn sample_income(
        &self,
        education: EducationLevel,
        occupation: &str,
        age: u32,
        rng: &mut impl Rng,
    ) -> Result<u64> {
        let constraints = self.table.get_constraints(age)?;
        let (base_min, base_max) = self.table.education_income_range(education);
        let factor = age_income_multiplier(age) * occupation_income_multiplier(occupation);

        let adjusted_min = (base_min as f64 * factor) as u64;
        let adjusted_max = (base_max as f64 * factor) as u64;

        let (band_min, band_max) = (constraints.min_income, constraints.max_income);
        let lo = adjusted_min.clamp(band_min, band_max).max(1);
        let hi = adjusted_max.clamp(band_min, band_max);

        if lo >= hi {
            return Ok(lo);
        }

        let log_min = (lo as f64).ln();
        let log_max = (hi as f64).ln();
        let mu = (log_min + log_max) / 2.0;
        // ~99.7% of the mass inside [lo, hi]
        let sigma = (log_max - log_min) / 6.0;

        let income = match LogNormal::new(mu, sigma) {
            Ok(dist) => dist.sample(rng) as u64,
            Err(_) => mu.exp() as u64,
        };

        Ok(income.clamp(lo, hi))
    }

    pub fn sample_location(&self, rng: &mut impl Rng) -> String {
        self.regions.sample(rng).to_string()
    }
}
