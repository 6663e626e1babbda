//! Common test utilities and fixtures

#![allow(dead_code)]

use persona_synth::reference::CsvReference;
use persona_synth::{GeneratorConfig, PersonaGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Census sample with 5-year ranges and a title line
pub fn reference_fixture() -> PathBuf {
    fixture_path("reference_sample.csv")
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator with default distributions
pub fn default_generator() -> PersonaGenerator {
    PersonaGenerator::new(GeneratorConfig::default()).expect("default config is valid")
}

/// Generator calibrated with the fixture reference table
pub fn reference_generator() -> PersonaGenerator {
    let reference = CsvReference::try_load(reference_fixture()).expect("fixture parses");
    PersonaGenerator::with_reference(GeneratorConfig::default(), Box::new(reference))
        .expect("default config is valid")
}
