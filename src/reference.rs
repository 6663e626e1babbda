//! Census reference statistics
//!
//! Population counts by age range, gender, marital status and education
//! level, read from a Statistics Korea style CSV export. KOSIS exports are
//! EUC-KR; UTF-8 files, with or without a BOM, are read as well. The
//! sampling core only sees the [`ReferenceStatsProvider`] trait; the CSV
//! layout stays here.
//!
//! Loading is best-effort. Malformed rows are skipped and an unreadable file
//! leaves the tables empty, in which case samplers use their defaults.

use crate::constraints::AgeBand;
use crate::error::{Error, Result};
use crate::models::{EducationLevel, Gender, MaritalStatus};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{Encoding, EUC_KR};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const AGE_COLUMN: &str = "연령별";
const GENDER_COLUMN: &str = "성별";
const MARITAL_COLUMN: &str = "혼인상태별";

/// Read-only population weights used to calibrate the samplers
pub trait ReferenceStatsProvider: Send + Sync {
    /// Population per education level (census column order) for everyone of
    /// `gender` whose age range lies inside `band`
    fn education_weights(&self, band: AgeBand, gender: Gender) -> Option<[u64; 6]>;

    /// Population per marital status for `gender` inside `band`
    fn marital_weights(
        &self,
        band: AgeBand,
        gender: Gender,
    ) -> Option<Vec<(MaritalStatus, u64)>>;

    fn is_empty(&self) -> bool;
}

/// No reference data; every sampler uses its default distribution
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReference;

impl ReferenceStatsProvider for NoReference {
    fn education_weights(&self, _band: AgeBand, _gender: Gender) -> Option<[u64; 6]> {
        None
    }

    fn marital_weights(
        &self,
        _band: AgeBand,
        _gender: Gender,
    ) -> Option<Vec<(MaritalStatus, u64)>> {
        None
    }

    fn is_empty(&self) -> bool {
        true
    }
}

type EducationCounts = BTreeMap<(Gender, String), [u64; 6]>;
type MaritalCounts = BTreeMap<Gender, BTreeMap<String, u64>>;

/// Reference tables parsed from a census CSV
#[derive(Debug, Clone, Default)]
pub struct CsvReference {
    education_stats: BTreeMap<AgeBand, EducationCounts>,
    marital_stats: BTreeMap<AgeBand, MaritalCounts>,
    skipped_rows: usize,
}

/// Column positions resolved from the header row
struct Columns {
    age: usize,
    gender: usize,
    marital: usize,
    education: [usize; 6],
}

impl Columns {
    fn resolve(header: &StringRecord) -> Option<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let mut education = [0usize; 6];
        for level in EducationLevel::ALL {
            education[level.index()] = find(level.label())?;
        }
        Some(Self {
            age: find(AGE_COLUMN)?,
            gender: find(GENDER_COLUMN)?,
            marital: find(MARITAL_COLUMN)?,
            education,
        })
    }
}

/// Parse an age range label such as "15~19" or "15～19세"
pub fn parse_age_range(label: &str) -> Option<AgeBand> {
    let cleaned: String = label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '세')
        .map(|c| if c == '～' { '~' } else { c })
        .collect();
    let (min, max) = cleaned.split_once('~')?;
    let min: u32 = min.parse().ok()?;
    let max: u32 = max.parse().ok()?;
    (min <= max).then(|| AgeBand::new(min, max))
}

/// Decode census bytes: a BOM wins, then valid UTF-8, otherwise EUC-KR
fn decode_census(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0;
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }
    let (text, _, had_errors) = EUC_KR.decode(bytes);
    if had_errors {
        warn!("Reference table is neither UTF-8 nor clean EUC-KR; unmappable bytes replaced");
    }
    text
}

/// Parse a population cell; "-" and blanks are absent
fn parse_count(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return None;
    }
    cell.replace(',', "").parse().ok()
}

impl CsvReference {
    /// Load from a file, degrading to empty tables on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(reference) => {
                info!(
                    "Loaded reference statistics from {:?}: {} age bands ({} rows skipped)",
                    path,
                    reference.education_stats.len(),
                    reference.skipped_rows
                );
                reference
            }
            Err(e) => {
                warn!("Reference statistics unavailable ({}), using default distributions", e);
                Self::default()
            }
        }
    }

    /// Load from a file, reporting failures
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_bytes(&bytes)
    }

    /// Parse raw file contents in EUC-KR or UTF-8
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = decode_census(bytes);
        Self::from_reader(text.as_bytes())
    }

    /// Parse UTF-8 CSV from any reader. The header row may be preceded by a
    /// title line.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut reference = Self::default();
        let mut columns: Option<Columns> = None;

        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    debug!("Skipping unreadable reference row: {}", e);
                    reference.skipped_rows += 1;
                    continue;
                }
            };

            match &columns {
                None => columns = Columns::resolve(&record),
                Some(cols) => {
                    if !reference.ingest_row(cols, &record) {
                        reference.skipped_rows += 1;
                    }
                }
            }
        }

        if columns.is_none() {
            return Err(Error::InvalidConfig(format!(
                "reference table has no header containing '{AGE_COLUMN}'"
            )));
        }

        Ok(reference)
    }

    fn ingest_row(&mut self, cols: &Columns, record: &StringRecord) -> bool {
        let Some(band) = record.get(cols.age).and_then(parse_age_range) else {
            return false;
        };
        let Some(gender) = record.get(cols.gender).and_then(Gender::from_label) else {
            return false;
        };
        let Some(marital) = record.get(cols.marital).map(|m| m.trim().to_string()) else {
            return false;
        };

        let mut counts = [0u64; 6];
        for (i, col) in cols.education.iter().enumerate() {
            counts[i] = record.get(*col).and_then(parse_count).unwrap_or(0);
        }

        let slot = self
            .education_stats
            .entry(band)
            .or_default()
            .entry((gender, marital.clone()))
            .or_insert([0; 6]);
        for (acc, n) in slot.iter_mut().zip(counts) {
            *acc += n;
        }

        let total: u64 = counts.iter().sum();
        if total > 0 {
            *self
                .marital_stats
                .entry(band)
                .or_default()
                .entry(gender)
                .or_default()
                .entry(marital)
                .or_insert(0) += total;
        }

        true
    }

    /// Rows that could not be used
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Age ranges present in the table
    pub fn age_bands(&self) -> impl Iterator<Item = &AgeBand> {
        self.education_stats.keys()
    }
}

impl ReferenceStatsProvider for CsvReference {
    fn education_weights(&self, band: AgeBand, gender: Gender) -> Option<[u64; 6]> {
        let mut weights = [0u64; 6];
        let mut found = false;

        for (_, by_key) in self.education_stats.iter().filter(|(b, _)| band.covers(b)) {
            for (_, counts) in by_key.iter().filter(|((g, _), _)| *g == gender) {
                found = true;
                for (acc, n) in weights.iter_mut().zip(counts) {
                    *acc += n;
                }
            }
        }

        found.then_some(weights)
    }

    fn marital_weights(
        &self,
        band: AgeBand,
        gender: Gender,
    ) -> Option<Vec<(MaritalStatus, u64)>> {
        let mut totals: BTreeMap<MaritalStatus, u64> = BTreeMap::new();
        let mut found = false;

        for (_, by_gender) in self.marital_stats.iter().filter(|(b, _)| band.covers(b)) {
            let Some(by_label) = by_gender.get(&gender) else {
                continue;
            };
            found = true;
            for (label, total) in by_label {
                // Aggregate rows such as "계" have no status
                if let Some(status) = MaritalStatus::from_label(label) {
                    *totals.entry(status).or_insert(0) += total;
                }
            }
        }

        found.then(|| totals.into_iter().collect())
    }

    fn is_empty(&self) -> bool {
        self.education_stats.is_empty()
    }
}
