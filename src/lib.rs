//! Synthetic Korean population personas with consistent demographics
//!
//! The hierarchical generator samples age, education, marital status,
//! occupation, income and location in dependency order against an age-band
//! constraint table, validates each candidate, and falls back to a safe
//! persona when retries run out. The [`flat`] module holds the simpler
//! variant with richer psychological and cultural attributes.

pub mod config;
pub mod constraints;
pub mod error;
pub mod flat;
pub mod generator;
pub mod models;
pub mod quality;
pub mod reference;
pub mod regions;
pub mod sampling;
pub mod validator;

pub use config::GeneratorConfig;
pub use constraints::{get_age_group_constraints, AgeBand, AgeBandConstraint, ConstraintTable};
pub use error::{Error, Result};
pub use generator::{AttemptFailure, BatchSummary, PersonaGenerator};
pub use models::{EducationLevel, Gender, GenerationAttempt, MaritalStatus, Persona};
pub use quality::{analyze_generation_quality, QualityReport};
pub use validator::{validate_persona, ValidationReport, Violation};
