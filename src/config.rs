//! Hierarchical generator configuration
//!
//! An immutable value handed to [`crate::generator::PersonaGenerator`] at
//! construction time. Binaries build it from CLI flags or a JSON file.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Sampling attempts before the fallback path is used
    pub max_attempts: u32,
    pub age: AgeSampling,
    /// Inclusive age range of the fallback path
    pub fallback_age_range: (u32, u32),
    /// Optional census table used to calibrate education and marital status
    pub reference_data: Option<PathBuf>,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

/// Truncated normal age distribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgeSampling {
    pub mean: f64,
    pub std_dev: f64,
    pub min_age: u32,
    pub max_age: u32,
    /// Rejection-sampling attempts before the uniform fallback
    pub max_draws: u32,
    /// Range of the uniform fallback, intersected with `[min_age, max_age]`
    pub uniform_fallback: (u32, u32),
}

impl Default for AgeSampling {
    fn default() -> Self {
        Self {
            mean: 35.0,
            std_dev: 12.0,
            min_age: 15,
            max_age: 65,
            max_draws: 50,
            uniform_fallback: (20, 60),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            age: AgeSampling::default(),
            fallback_age_range: (20, 45),
            reference_data: None,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_reference_data(mut self, path: Option<PathBuf>) -> Self {
        self.reference_data = path;
        self
    }

    /// Reject settings the sampler cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be at least 1".into()));
        }
        let age = &self.age;
        if age.min_age < crate::constraints::MIN_SUPPORTED_AGE {
            return Err(Error::InvalidConfig(format!(
                "age.min_age {} is below the supported minimum {}",
                age.min_age,
                crate::constraints::MIN_SUPPORTED_AGE
            )));
        }
        if age.min_age > age.max_age {
            return Err(Error::InvalidConfig("age.min_age exceeds age.max_age".into()));
        }
        if !(age.std_dev.is_finite() && age.std_dev > 0.0) {
            return Err(Error::InvalidConfig("age.std_dev must be positive".into()));
        }
        let (lo, hi) = self.fallback_age_range;
        if lo < 20 || hi > 45 || lo > hi {
            return Err(Error::InvalidConfig(format!(
                "fallback_age_range ({lo}, {hi}) must lie within 20..=45"
            )));
        }
        Ok(())
    }

    /// Seeded RNG when a seed is set, entropy otherwise
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.fallback_age_range, (20, 45));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"max_attempts": 3, "age": {"mean": 40.0}}"#).unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.age.mean, 40.0);
        assert_eq!(config.age.std_dev, 12.0);
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = GeneratorConfig::default();
        config.age.min_age = 10;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.fallback_age_range = (18, 45);
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = GeneratorConfig::default().with_seed(Some(7));
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"seed": 99}"#).unwrap();
        let config = GeneratorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, Some(99));

        std::fs::write(&path, r#"{"max_attempts": 0}"#).unwrap();
        assert!(GeneratorConfig::from_json_file(&path).is_err());
    }
}
