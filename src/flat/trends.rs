//! Yearly demographic trends for the flat generator
//!
//! Observed age-group and regional shares for 2020-2024, and projections
//! for 2025-2030 that continue population ageing and the drift towards
//! 경기 and 세종. Years outside the table use the 2024 data.

use super::{AgeGroup, AGE_GROUPS};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const FIRST_YEAR: i32 = 2020;
pub const BASE_YEAR: i32 = 2024;
pub const LAST_YEAR: i32 = 2030;

/// Short region names in table column order
pub const REGIONS: [&str; 17] = [
    "서울", "부산", "대구", "인천", "광주", "대전", "울산", "세종", "경기", "강원", "충북", "충남",
    "전북", "전남", "경북", "경남", "제주",
];

/// (year, age shares, regional shares, total fertility rate, urbanization rate)
type ObservedYear = (i32, [f64; 9], [f64; 17], f64, f64);

const OBSERVED: [ObservedYear; 5] = [
    (
        2020,
        [0.089, 0.095, 0.135, 0.145, 0.168, 0.163, 0.118, 0.065, 0.042],
        [
            0.188, 0.067, 0.048, 0.058, 0.029, 0.030, 0.023, 0.006, 0.250, 0.030, 0.031, 0.042,
            0.036, 0.037, 0.053, 0.067, 0.013,
        ],
        0.84,
        0.813,
    ),
    (
        2021,
        [0.087, 0.093, 0.133, 0.144, 0.167, 0.164, 0.120, 0.067, 0.045],
        [
            0.185, 0.066, 0.047, 0.059, 0.029, 0.030, 0.022, 0.007, 0.254, 0.029, 0.031, 0.043,
            0.035, 0.036, 0.052, 0.066, 0.014,
        ],
        0.81,
        0.816,
    ),
    (
        2022,
        [0.085, 0.091, 0.131, 0.143, 0.166, 0.165, 0.122, 0.069, 0.048],
        [
            0.182, 0.065, 0.046, 0.060, 0.028, 0.029, 0.021, 0.008, 0.258, 0.029, 0.031, 0.044,
            0.034, 0.035, 0.051, 0.065, 0.015,
        ],
        0.78,
        0.819,
    ),
    (
        2023,
        [0.083, 0.089, 0.129, 0.142, 0.165, 0.166, 0.124, 0.071, 0.051],
        [
            0.179, 0.064, 0.045, 0.061, 0.028, 0.029, 0.020, 0.009, 0.262, 0.028, 0.031, 0.045,
            0.033, 0.034, 0.050, 0.064, 0.016,
        ],
        0.72,
        0.822,
    ),
    (
        2024,
        [0.081, 0.087, 0.127, 0.141, 0.164, 0.167, 0.126, 0.073, 0.054],
        [
            0.176, 0.063, 0.044, 0.062, 0.027, 0.028, 0.019, 0.010, 0.266, 0.027, 0.031, 0.046,
            0.032, 0.033, 0.049, 0.063, 0.017,
        ],
        0.70,
        0.825,
    ),
];

/// Demographic shares for one year
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearTrends {
    pub year: i32,
    pub age_distribution: Vec<(AgeGroup, f64)>,
    pub regional_distribution: Vec<(&'static str, f64)>,
    pub birth_rate: f64,
    pub urbanization_rate: f64,
    pub projected: bool,
}

impl YearTrends {
    fn observed(row: &ObservedYear) -> Self {
        let (year, ages, regions, birth_rate, urbanization_rate) = *row;
        Self {
            year,
            age_distribution: AGE_GROUPS.iter().copied().zip(ages).collect(),
            regional_distribution: REGIONS.iter().copied().zip(regions).collect(),
            birth_rate,
            urbanization_rate,
            projected: false,
        }
    }

    /// One year of ageing and metropolitan drift
    fn project(&self) -> Self {
        let age_distribution = self
            .age_distribution
            .iter()
            .map(|(group, share)| {
                let next = match group.min_age {
                    0 => (share - 0.002).max(0.05),
                    10 => (share - 0.002).max(0.06),
                    60 => (share + 0.002).min(0.15),
                    70 => (share + 0.002).min(0.10),
                    80 => (share + 0.003).min(0.08),
                    _ => *share,
                };
                (*group, next)
            })
            .collect();

        let regional_distribution = self
            .regional_distribution
            .iter()
            .map(|(region, share)| {
                let next = match *region {
                    "경기" => (share + 0.002).min(0.28),
                    "세종" => (share + 0.001).min(0.015),
                    _ => *share,
                };
                (*region, next)
            })
            .collect();

        Self {
            year: self.year + 1,
            age_distribution,
            regional_distribution,
            birth_rate: (self.birth_rate - 0.02).max(0.5),
            urbanization_rate: (self.urbanization_rate + 0.003).min(0.85),
            projected: true,
        }
    }

    pub fn age_share(&self, group: AgeGroup) -> Option<f64> {
        self.age_distribution
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, s)| *s)
    }

    pub fn region_share(&self, region: &str) -> Option<f64> {
        self.regional_distribution
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, s)| *s)
    }
}

static TRENDS: LazyLock<BTreeMap<i32, YearTrends>> = LazyLock::new(|| {
    let mut table: BTreeMap<i32, YearTrends> = OBSERVED
        .iter()
        .map(|row| (row.0, YearTrends::observed(row)))
        .collect();

    let mut last = YearTrends::observed(&OBSERVED[OBSERVED.len() - 1]);
    while last.year < LAST_YEAR {
        last = last.project();
        table.insert(last.year, last.clone());
    }
    table
});

/// Trends for `year`; years outside 2020-2030 get the base year
pub fn year_data(year: i32) -> &'static YearTrends {
    let year = if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
        year
    } else {
        BASE_YEAR
    };
    TRENDS
        .get(&year)
        .unwrap_or_else(|| &*BASE_TRENDS)
}

static BASE_TRENDS: LazyLock<YearTrends> =
    LazyLock::new(|| YearTrends::observed(&OBSERVED[OBSERVED.len() - 1]));

/// Years with data, oldest first
pub fn available_years() -> impl Iterator<Item = i32> {
    TRENDS.keys().copied()
}
