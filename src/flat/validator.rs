//! Rule checks for flat personas
//!
//! Errors reject a persona; warnings flag unusual but possible combinations
//! and are only reported.

use super::generator::FlatDemographics;
use super::{FlatEducation, IncomeBracket};
use crate::constraints::{ConstraintTable, CONSTRAINTS};
use crate::models::MaritalStatus;
use serde::Serialize;

/// Inclusive age range accepted at all
const AGE_LIMITS: (u32, u32) = (0, 99);

/// Age ranges for occupations, matched as words in declaration order
const AGE_OCCUPATION_RULES: &[(&str, u32, u32)] = &[
    ("기타 무직", 0, 6),
    ("무직", 0, 6),
    ("초등학생", 7, 12),
    ("중학생", 13, 15),
    ("고등학생", 16, 18),
    ("대학생", 18, 28),
    ("대학원생", 22, 35),
    ("취업준비생", 18, 35),
    ("은퇴자", 55, 99),
    ("전업주부", 20, 80),
    ("육아휴직중", 20, 45),
];

/// Education usually expected for professional occupations
const EDUCATION_PREFERENCES: &[(&str, &[FlatEducation])] = &[
    ("의사", &[FlatEducation::Bachelor, FlatEducation::Graduate]),
    ("변호사", &[FlatEducation::Bachelor, FlatEducation::Graduate]),
    ("교사", &[FlatEducation::Bachelor, FlatEducation::Graduate]),
    ("교수", &[FlatEducation::Graduate]),
    ("연구원", &[FlatEducation::Bachelor, FlatEducation::Graduate]),
];

/// Ages at which an education level is plausible
fn education_age_range(education: FlatEducation) -> (u32, u32) {
    match education {
        FlatEducation::None => (0, 12),
        FlatEducation::Elementary => (13, 99),
        FlatEducation::Middle => (16, 99),
        FlatEducation::High => (18, 99),
        FlatEducation::Bachelor => (22, 99),
        FlatEducation::Graduate => (24, 99),
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FlatValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Sizes of the rule tables
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuleStatistics {
    pub age_range: String,
    pub occupation_rules_count: usize,
    pub education_rules_count: usize,
    pub marital_rules_count: usize,
    pub professional_jobs_tracked: usize,
}

#[derive(Debug, Clone)]
pub struct FlatValidator {
    marital_minimums: Vec<(MaritalStatus, u32)>,
}

impl FlatValidator {
    /// Validator using the shared constraint table's marriage ages
    pub fn new() -> Self {
        Self::from_table(&CONSTRAINTS)
    }

    pub fn from_table(table: &ConstraintTable) -> Self {
        let marital_minimums = MaritalStatus::ALL
            .into_iter()
            .map(|status| (status, table.minimum_marital_age(status)))
            .collect();
        Self { marital_minimums }
    }

    pub fn validate(&self, demographics: &FlatDemographics) -> FlatValidation {
        let age = demographics.age;
        let occupation = demographics.occupation.as_str();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !(AGE_LIMITS.0..=AGE_LIMITS.1).contains(&age) {
            errors.push(format!("age {age} is outside {}-{}", AGE_LIMITS.0, AGE_LIMITS.1));
        }

        if let Some(error) = check_age_occupation(age, occupation) {
            errors.push(error);
        }

        let (edu_min, edu_max) = education_age_range(demographics.education);
        if !(edu_min..=edu_max).contains(&age) {
            errors.push(format!(
                "age {age} does not fit education '{}' (minimum age {edu_min})",
                demographics.education
            ));
        }

        let status = demographics.marital_status;
        let minimum = self.minimum_marital_age(status);
        if age < minimum {
            errors.push(format!(
                "age {age} does not fit marital status '{status}' (minimum age {minimum})"
            ));
        }

        if age <= 18 && demographics.income_bracket != IncomeBracket::Bottom20 {
            errors.push(format!(
                "age {age} only allows the '{}' income bracket, got '{}'",
                IncomeBracket::Bottom20,
                demographics.income_bracket
            ));
        }

        if let Some(warning) = check_education_occupation(demographics.education, occupation) {
            warnings.push(warning);
        }

        FlatValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn minimum_marital_age(&self, status: MaritalStatus) -> u32 {
        self.marital_minimums
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, age)| *age)
            .unwrap_or(0)
    }

    pub fn rule_statistics(&self) -> RuleStatistics {
        RuleStatistics {
            age_range: format!("{}-{}", AGE_LIMITS.0, AGE_LIMITS.1),
            occupation_rules_count: AGE_OCCUPATION_RULES.len(),
            education_rules_count: FlatEducation::ALL.len(),
            marital_rules_count: self.marital_minimums.len(),
            professional_jobs_tracked: EDUCATION_PREFERENCES.len(),
        }
    }
}

impl Default for FlatValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `key` occurs in `occupation` as a word: at the start or after a
/// separator. "무직" matches "기타 무직" but not "사무직".
fn mentions(occupation: &str, key: &str) -> bool {
    occupation.match_indices(key).any(|(i, _)| {
        occupation[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

/// First occupation rule that matches and fails
fn check_age_occupation(age: u32, occupation: &str) -> Option<String> {
    AGE_OCCUPATION_RULES
        .iter()
        .filter(|(key, _, _)| mentions(occupation, key))
        .find(|(_, min, max)| !(*min..=*max).contains(&age))
        .map(|(_, min, max)| {
            format!("age {age} does not fit occupation '{occupation}' (expected {min}-{max})")
        })
}

fn check_education_occupation(education: FlatEducation, occupation: &str) -> Option<String> {
    EDUCATION_PREFERENCES
        .iter()
        .find(|(key, expected)| mentions(occupation, key) && !expected.contains(&education))
        .map(|(_, expected)| {
            let expected: Vec<&str> = expected.iter().map(|e| e.label()).collect();
            format!(
                "'{occupation}' usually requires {} (got '{education}')",
                expected.join("/")
            )
        })
}
