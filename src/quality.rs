//! Batch quality statistics

use crate::constraints::ConstraintTable;
use crate::models::Persona;
use crate::validator::validate_persona;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of validation messages kept in a report
const SAMPLE_ERRORS: usize = 10;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NumericStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Distributions {
    pub gender: BTreeMap<String, usize>,
    pub education: BTreeMap<String, usize>,
    pub marital_status: BTreeMap<String, usize>,
    pub occupation: BTreeMap<String, usize>,
    pub location: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityReport {
    pub total_personas: usize,
    pub age_stats: NumericStats,
    pub income_stats: NumericStats,
    pub distributions: Distributions,
    pub validation_errors: usize,
    /// First few validation messages
    pub error_samples: Vec<String>,
    /// 0 to 100; 100 means no validation errors
    pub quality_score: f64,
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

/// Summarize a batch: numeric stats, categorical counts and a validation
/// based quality score. An empty batch scores 0.
pub fn analyze_generation_quality(personas: &[Persona]) -> QualityReport {
    analyze_with_table(&ConstraintTable::standard(), personas)
}

pub fn analyze_with_table(table: &ConstraintTable, personas: &[Persona]) -> QualityReport {
    if personas.is_empty() {
        return QualityReport::default();
    }

    let ages: Vec<f64> = personas.iter().map(|p| p.age as f64).collect();
    let incomes: Vec<f64> = personas.iter().map(|p| p.income as f64).collect();

    let mut distributions = Distributions::default();
    let mut validation_errors = 0;
    let mut error_samples = Vec::new();

    for persona in personas {
        bump(&mut distributions.gender, persona.gender.label());
        bump(&mut distributions.education, persona.education.label());
        bump(&mut distributions.marital_status, persona.marital_status.label());
        bump(&mut distributions.occupation, &persona.occupation);
        bump(&mut distributions.location, &persona.location);

        let errors = validate_persona(table, persona).errors();
        validation_errors += errors.len();
        for error in errors {
            if error_samples.len() < SAMPLE_ERRORS {
                error_samples.push(error);
            }
        }
    }

    let total = personas.len();
    let quality_score = (100.0 - validation_errors as f64 / total as f64 * 100.0).max(0.0);

    QualityReport {
        total_personas: total,
        age_stats: NumericStats::from_values(&ages),
        income_stats: NumericStats::from_values(&incomes),
        distributions,
        validation_errors,
        error_samples,
        quality_score,
    }
}
