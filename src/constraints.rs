//! Age-band constraint table
//!
//! Admissible education levels, marital statuses, income bounds and
//! occupation categories per age band, plus the per-education income ranges
//! and per-occupation education requirements. Based on Statistics Korea
//! population tables. Every rule the generator and validators check is
//! declared here.

use crate::error::{Error, Result};
use crate::models::{EducationLevel, MaritalStatus};
use serde::Serialize;
use std::sync::LazyLock;

use EducationLevel::*;
use MaritalStatus::*;

/// No statistical basis below this age
pub const MIN_SUPPORTED_AGE: u32 = 15;

/// Inclusive age range used as a lookup key
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgeBand {
    pub min_age: u32,
    pub max_age: u32,
}

impl AgeBand {
    pub const fn new(min_age: u32, max_age: u32) -> Self {
        Self { min_age, max_age }
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min_age <= age && age <= self.max_age
    }

    /// Whether `other` lies entirely inside this band
    pub fn covers(&self, other: &AgeBand) -> bool {
        self.min_age <= other.min_age && other.max_age <= self.max_age
    }
}

/// Admissible attribute values for one age band
#[derive(Debug, Clone, Serialize)]
pub struct AgeBandConstraint {
    pub min_age: u32,
    pub max_age: u32,
    pub valid_education_levels: Vec<EducationLevel>,
    pub valid_marital_statuses: Vec<MaritalStatus>,
    pub min_income: u64,
    pub max_income: u64,
    pub occupation_categories: Vec<&'static str>,
}

impl AgeBandConstraint {
    pub fn band(&self) -> AgeBand {
        AgeBand::new(self.min_age, self.max_age)
    }

    pub fn admits_education(&self, education: EducationLevel) -> bool {
        self.valid_education_levels.contains(&education)
    }

    pub fn admits_marital_status(&self, status: MaritalStatus) -> bool {
        self.valid_marital_statuses.contains(&status)
    }

    pub fn admits_income(&self, income: u64) -> bool {
        self.min_income <= income && income <= self.max_income
    }
}

/// The complete rule table
#[derive(Debug, Clone)]
pub struct ConstraintTable {
    bands: Vec<AgeBandConstraint>,
    senior: AgeBandConstraint,
    occupation_requirements: Vec<(&'static str, Vec<EducationLevel>)>,
}

/// Shared table, built once on first use
pub static CONSTRAINTS: LazyLock<ConstraintTable> = LazyLock::new(ConstraintTable::standard);

fn band(
    min_age: u32,
    max_age: u32,
    education: &[EducationLevel],
    marital: &[MaritalStatus],
    income: (u64, u64),
    occupations: &[&'static str],
) -> AgeBandConstraint {
    AgeBandConstraint {
        min_age,
        max_age,
        valid_education_levels: education.to_vec(),
        valid_marital_statuses: marital.to_vec(),
        min_income: income.0,
        max_income: income.1,
        occupation_categories: occupations.to_vec(),
    }
}

impl ConstraintTable {
    /// The Statistics Korea based table
    pub fn standard() -> Self {
        let bands = vec![
            band(
                15,
                19,
                &[MiddleSchool, HighSchool],
                &[Single],
                (0, 1_000_000),
                &["학생", "아르바이트"],
            ),
            band(
                20,
                24,
                &[HighSchool, College, University],
                &[Single, Married],
                (0, 3_000_000),
                &["학생", "사원", "인턴", "프리랜서"],
            ),
            band(
                25,
                29,
                &[HighSchool, College, University, Master],
                &[Single, Married],
                (1_500_000, 5_000_000),
                &["사원", "대리", "연구원", "전문직", "프리랜서"],
            ),
            band(
                30,
                39,
                &[HighSchool, College, University, Master, Doctorate],
                &[Single, Married, Divorced],
                (2_000_000, 8_000_000),
                &["과장", "차장", "팀장", "전문직", "관리직", "자영업"],
            ),
            band(
                40,
                49,
                &[HighSchool, College, University, Master, Doctorate],
                &[Married, Divorced, Single],
                (2_500_000, 12_000_000),
                &["부장", "이사", "임원", "전문직", "자영업", "프리랜서"],
            ),
            band(
                50,
                64,
                &[HighSchool, College, University, Master, Doctorate],
                &[Married, Divorced, Widowed],
                (2_000_000, 15_000_000),
                &["임원", "전문직", "자영업", "컨설턴트", "무직"],
            ),
        ];

        // 65 and over
        let senior = band(
            65,
            100,
            &[HighSchool, College, University, Master, Doctorate],
            &[Married, Divorced, Widowed],
            (1_500_000, 5_000_000),
            &["은퇴", "무직", "자영업"],
        );

        let all_levels = EducationLevel::ALL.to_vec();
        let occupation_requirements = vec![
            ("의사", vec![University, Master, Doctorate]),
            ("변호사", vec![University, Master, Doctorate]),
            ("교수", vec![Master, Doctorate]),
            ("연구원", vec![University, Master, Doctorate]),
            ("엔지니어", vec![College, University, Master]),
            ("간호사", vec![HighSchool, College, University]),
            ("교사", vec![University, Master]),
            ("회계사", vec![University, Master]),
            ("디자이너", vec![College, University, Master]),
            ("프로그래머", vec![College, University, Master]),
            ("마케터", vec![University, Master]),
            ("영업사원", vec![HighSchool, College, University]),
            ("사무직", vec![HighSchool, College, University]),
            ("서비스직", vec![MiddleSchool, HighSchool, College]),
            ("자영업", vec![MiddleSchool, HighSchool, College, University]),
            ("학생", vec![MiddleSchool, HighSchool, College, University, Master]),
            ("무직", all_levels),
        ];

        Self {
            bands,
            senior,
            occupation_requirements,
        }
    }

    /// Constraints for the band containing `age`
    pub fn get_constraints(&self, age: u32) -> Result<&AgeBandConstraint> {
        if age < MIN_SUPPORTED_AGE {
            return Err(Error::UnsupportedAge {
                age,
                minimum: MIN_SUPPORTED_AGE,
            });
        }

        Ok(self
            .bands
            .iter()
            .find(|c| c.band().contains(age))
            .unwrap_or(&self.senior))
    }

    /// All declared bands, youngest first, including the 65+ band
    pub fn bands(&self) -> impl Iterator<Item = &AgeBandConstraint> {
        self.bands.iter().chain(std::iter::once(&self.senior))
    }

    /// Base monthly income range for an education level
    pub fn education_income_range(&self, education: EducationLevel) -> (u64, u64) {
        match education {
            MiddleSchool => (1_200_000, 3_000_000),
            HighSchool => (1_500_000, 4_000_000),
            College => (2_000_000, 5_000_000),
            University => (2_500_000, 8_000_000),
            Master => (3_500_000, 12_000_000),
            Doctorate => (4_500_000, 20_000_000),
        }
    }

    /// Education levels an occupation requires, if it declares any
    pub fn required_education(&self, occupation: &str) -> Option<&[EducationLevel]> {
        self.occupation_requirements
            .iter()
            .find(|(name, _)| *name == occupation)
            .map(|(_, levels)| levels.as_slice())
    }

    /// Occupations with declared requirements, in declaration order
    pub fn occupation_requirements(&self) -> &[(&'static str, Vec<EducationLevel>)] {
        &self.occupation_requirements
    }

    /// Youngest age at which a marital status is admissible.
    ///
    /// Statuses admitted by the youngest band have no floor.
    pub fn minimum_marital_age(&self, status: MaritalStatus) -> u32 {
        let mut bands = self.bands();
        let Some(youngest) = bands.next() else {
            return 0;
        };
        if youngest.admits_marital_status(status) {
            return 0;
        }
        bands
            .find(|c| c.admits_marital_status(status))
            .map(|c| c.min_age)
            .unwrap_or(u32::MAX)
    }
}

impl Default for ConstraintTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Constraints for `age` from the shared table
pub fn get_age_group_constraints(age: u32) -> Result<&'static AgeBandConstraint> {
    CONSTRAINTS.get_constraints(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_lookup() {
        let table = ConstraintTable::standard();
        assert_eq!(table.get_constraints(15).unwrap().band(), AgeBand::new(15, 19));
        assert_eq!(table.get_constraints(24).unwrap().band(), AgeBand::new(20, 24));
        assert_eq!(table.get_constraints(39).unwrap().band(), AgeBand::new(30, 39));
        assert_eq!(table.get_constraints(64).unwrap().band(), AgeBand::new(50, 64));
        assert_eq!(table.get_constraints(65).unwrap().band(), AgeBand::new(65, 100));
        assert_eq!(table.get_constraints(104).unwrap().band(), AgeBand::new(65, 100));
    }

    #[test]
    fn test_below_floor_is_rejected() {
        let table = ConstraintTable::standard();
        let err = table.get_constraints(14).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAge { age: 14, minimum: 15 }));
    }

    #[test]
    fn test_teen_band_contents() {
        let teen = get_age_group_constraints(17).unwrap();
        assert_eq!(teen.valid_marital_statuses, vec![Single]);
        assert!(teen.admits_education(MiddleSchool));
        assert!(!teen.admits_education(University));
        assert!(teen.admits_income(0));
        assert!(!teen.admits_income(1_000_001));
    }

    #[test]
    fn test_bands_are_contiguous() {
        let table = ConstraintTable::standard();
        let bands: Vec<_> = table.bands().collect();
        for pair in bands.windows(2) {
            assert_eq!(pair[0].max_age + 1, pair[1].min_age);
        }
        for c in bands {
            assert!(c.min_income < c.max_income);
            assert!(!c.valid_education_levels.is_empty());
            assert!(!c.valid_marital_statuses.is_empty());
        }
    }

    #[test]
    fn test_requirements() {
        let table = ConstraintTable::standard();
        assert_eq!(table.required_education("교수"), Some(&[Master, Doctorate][..]));
        assert!(table.required_education("판사").is_none());
        assert_eq!(table.required_education("무직").unwrap().len(), 6);
    }

    #[test]
    fn test_minimum_marital_age() {
        let table = ConstraintTable::standard();
        assert_eq!(table.minimum_marital_age(Single), 0);
        assert_eq!(table.minimum_marital_age(Married), 20);
        assert_eq!(table.minimum_marital_age(Divorced), 30);
        assert_eq!(table.minimum_marital_age(Widowed), 50);
    }

    #[test]
    fn test_income_ranges_increase_with_education() {
        let table = ConstraintTable::standard();
        let mins: Vec<u64> = EducationLevel::ALL
            .iter()
            .map(|e| table.education_income_range(*e).0)
            .collect();
        assert!(mins.windows(2).all(|w| w[0] < w[1]));
    }
}
