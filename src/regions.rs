//! Administrative regions and population-weighted location sampling
//!
//! Based on 2022 Statistics Korea resident population shares.
//! Source: Statistics Korea (KOSIS), resident registration population

use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// (full name, short name, population share)
type RegionPopData = &'static [(&'static str, &'static str, f64)];

/// 17 first-level administrative regions
pub const REGION_POPULATION: RegionPopData = &[
    ("서울특별시", "서울", 0.195),
    ("부산광역시", "부산", 0.066),
    ("대구광역시", "대구", 0.047),
    ("인천광역시", "인천", 0.057),
    ("광주광역시", "광주", 0.029),
    ("대전광역시", "대전", 0.030),
    ("울산광역시", "울산", 0.022),
    ("세종특별자치시", "세종", 0.007),
    ("경기도", "경기", 0.264),
    ("강원도", "강원", 0.028),
    ("충청북도", "충북", 0.030),
    ("충청남도", "충남", 0.039),
    ("전라북도", "전북", 0.033),
    ("전라남도", "전남", 0.031),
    ("경상북도", "경북", 0.048),
    ("경상남도", "경남", 0.062),
    ("제주특별자치도", "제주", 0.012),
];

/// Short name for a full region name (e.g., "서울특별시" → "서울")
pub fn get_region_short(full: &str) -> &str {
    REGION_POPULATION
        .iter()
        .find(|(name, _, _)| *name == full)
        .map(|(_, short, _)| *short)
        .unwrap_or(full)
}

/// Population-weighted sampler over the 17 regions
#[derive(Debug, Clone)]
pub struct RegionSampler {
    names: Vec<&'static str>,
    shares: Vec<f64>,
    dist: Option<WeightedIndex<f64>>,
}

impl RegionSampler {
    pub fn new() -> Self {
        Self::from_table(REGION_POPULATION)
    }

    /// Build from a table whose weights need not sum to 1
    fn from_table(table: RegionPopData) -> Self {
        let total: f64 = table.iter().map(|(_, _, w)| w).sum();
        let names: Vec<&'static str> = table.iter().map(|(name, _, _)| *name).collect();
        let shares: Vec<f64> = table.iter().map(|(_, _, w)| w / total).collect();
        let dist = WeightedIndex::new(&shares).ok();

        Self { names, shares, dist }
    }

    /// Draw one region name
    pub fn sample(&self, rng: &mut impl Rng) -> &'static str {
        match &self.dist {
            Some(dist) => self.names[dist.sample(rng)],
            // Degenerate weights: uniform
            None => self.names.choose(rng).copied().unwrap_or("서울특별시"),
        }
    }

    /// Normalized population share per region
    pub fn expected_shares(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.names.iter().copied().zip(self.shares.iter().copied())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| *n == name)
    }
}

impl Default for RegionSampler {
    fn default() -> Self {
        Self::new()
    }
}
