//! Simple (flat) persona variant
//!
//! A looser generator that samples demographics independently from
//! configured distributions, decorates them with psychological, behavioral
//! and cultural attributes, and accepts a persona once the flat validator
//! reports no errors.

pub mod config;
pub mod generator;
pub mod trends;
pub mod validator;

pub use config::FlatConfig;
pub use generator::{
    FlatBatch, FlatConstraints, FlatGenerationStats, FlatPersona, FlatPersonaGenerator,
};
pub use validator::{FlatValidation, FlatValidator, RuleStatistics};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat education scale, lowest first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlatEducation {
    #[serde(rename = "없음")]
    None,
    #[serde(rename = "초졸")]
    Elementary,
    #[serde(rename = "중졸")]
    Middle,
    #[serde(rename = "고졸")]
    High,
    #[serde(rename = "대졸")]
    Bachelor,
    #[serde(rename = "대학원졸")]
    Graduate,
}

impl FlatEducation {
    pub const ALL: [FlatEducation; 6] = [
        FlatEducation::None,
        FlatEducation::Elementary,
        FlatEducation::Middle,
        FlatEducation::High,
        FlatEducation::Bachelor,
        FlatEducation::Graduate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FlatEducation::None => "없음",
            FlatEducation::Elementary => "초졸",
            FlatEducation::Middle => "중졸",
            FlatEducation::High => "고졸",
            FlatEducation::Bachelor => "대졸",
            FlatEducation::Graduate => "대학원졸",
        }
    }
}

impl fmt::Display for FlatEducation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Income quintile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncomeBracket {
    #[serde(rename = "하위 20%")]
    Bottom20,
    #[serde(rename = "20-40%")]
    Lower,
    #[serde(rename = "40-60%")]
    Middle,
    #[serde(rename = "60-80%")]
    Upper,
    #[serde(rename = "상위 20%")]
    Top20,
}

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 5] = [
        IncomeBracket::Bottom20,
        IncomeBracket::Lower,
        IncomeBracket::Middle,
        IncomeBracket::Upper,
        IncomeBracket::Top20,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IncomeBracket::Bottom20 => "하위 20%",
            IncomeBracket::Lower => "20-40%",
            IncomeBracket::Middle => "40-60%",
            IncomeBracket::Upper => "60-80%",
            IncomeBracket::Top20 => "상위 20%",
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Age group used by the flat distributions; the open-ended top group
/// runs to 100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgeGroup {
    pub min_age: u32,
    pub max_age: u32,
}

impl AgeGroup {
    pub const fn new(min_age: u32, max_age: u32) -> Self {
        Self { min_age, max_age }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max_age >= 100 {
            write!(f, "{}+", self.min_age)
        } else {
            write!(f, "{}-{}", self.min_age, self.max_age)
        }
    }
}

/// The nine groups of the yearly distributions
pub const AGE_GROUPS: [AgeGroup; 9] = [
    AgeGroup::new(0, 9),
    AgeGroup::new(10, 19),
    AgeGroup::new(20, 29),
    AgeGroup::new(30, 39),
    AgeGroup::new(40, 49),
    AgeGroup::new(50, 59),
    AgeGroup::new(60, 69),
    AgeGroup::new(70, 79),
    AgeGroup::new(80, 100),
];

/// Generational cohort, by age
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Generation {
    #[serde(rename = "Z세대")]
    GenZ,
    #[serde(rename = "밀레니얼")]
    Millennial,
    #[serde(rename = "X세대")]
    GenX,
    #[serde(rename = "베이비부머")]
    BabyBoomer,
}

impl Generation {
    /// Cohort for an age; children under 10 have none
    pub fn for_age(age: u32) -> Option<Self> {
        match age {
            10..=24 => Some(Generation::GenZ),
            25..=44 => Some(Generation::Millennial),
            45..=59 => Some(Generation::GenX),
            60.. => Some(Generation::BabyBoomer),
            _ => None,
        }
    }
}
