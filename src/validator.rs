//! Consistency rules for hierarchical personas

use crate::constraints::{ConstraintTable, MIN_SUPPORTED_AGE};
use crate::models::occupations::{CREDENTIALED, PART_TIME, STUDENT};
use crate::models::{EducationLevel, MaritalStatus, Persona};
use thiserror::Error;

/// Highest plausible monthly income at 19 or younger
const MINOR_INCOME_CAP: u64 = 2_000_000;
/// Highest plausible monthly income for a student
const STUDENT_INCOME_CAP: u64 = 1_000_000;
/// Oldest age at which 학생 is plausible
const STUDENT_MAX_AGE: u32 = 30;

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("age {age} is below the supported minimum of {}", MIN_SUPPORTED_AGE)]
    UnsupportedAge { age: u32 },
    #[error("education '{education}' is not admissible at age {age}")]
    EducationForAge { age: u32, education: EducationLevel },
    #[error("marital status '{status}' is not admissible at age {age}")]
    MaritalForAge { age: u32, status: MaritalStatus },
    #[error("income {income} KRW is outside the range for age {age}")]
    IncomeForAge { age: u32, income: u64 },
    #[error("occupation '{occupation}' does not accept education '{education}'")]
    EducationForOccupation {
        occupation: String,
        education: EducationLevel,
    },
    #[error("age {age} is too young for a university degree")]
    MinorWithDegree { age: u32 },
    #[error("age {age} is too young for a graduate degree")]
    TooYoungForGraduate { age: u32 },
    #[error("age {age} is too young for a doctorate")]
    TooYoungForDoctorate { age: u32 },
    #[error("minor aged {age} cannot be {status}")]
    MinorMarried { age: u32, status: MaritalStatus },
    #[error("age {age} may only be a student or part-time worker, got '{occupation}'")]
    TeenOccupation { age: u32, occupation: String },
    #[error("age {age} is implausible for a student")]
    StudentTooOld { age: u32 },
    #[error("occupation '{occupation}' requires a university degree or higher")]
    CredentialRequired { occupation: String },
    #[error("income {income} KRW is implausible at age {age}")]
    MinorIncome { age: u32, income: u64 },
    #[error("income {income} KRW is implausible for a student")]
    StudentIncome { income: u64 },
}

/// Outcome of validating one persona
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable messages in rule order
    pub fn errors(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }

    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.is_valid(), self.errors())
    }
}

/// Check a persona against every rule. All violations are collected; an
/// age below the supported floor is reported and the remaining rules still
/// run.
pub fn validate_persona(table: &ConstraintTable, persona: &Persona) -> ValidationReport {
    let Persona {
        age,
        education,
        marital_status,
        income,
        ..
    } = *persona;
    let occupation = persona.occupation.as_str();
    let mut violations = Vec::new();

    match table.get_constraints(age) {
        Ok(band) => {
            if !band.admits_education(education) {
                violations.push(Violation::EducationForAge { age, education });
            }
            if !band.admits_marital_status(marital_status) {
                violations.push(Violation::MaritalForAge {
                    age,
                    status: marital_status,
                });
            }
            if !band.admits_income(income) {
                violations.push(Violation::IncomeForAge { age, income });
            }
        }
        Err(_) => violations.push(Violation::UnsupportedAge { age }),
    }

    if let Some(required) = table.required_education(occupation) {
        if !required.contains(&education) {
            violations.push(Violation::EducationForOccupation {
                occupation: occupation.to_string(),
                education,
            });
        }
    }

    if age < 18 && education.is_university_or_higher() {
        violations.push(Violation::MinorWithDegree { age });
    }
    if age < 22 && education.is_graduate() {
        violations.push(Violation::TooYoungForGraduate { age });
    }
    if age < 26 && education == EducationLevel::Doctorate {
        violations.push(Violation::TooYoungForDoctorate { age });
    }
    if age < 18 && marital_status != MaritalStatus::Single {
        violations.push(Violation::MinorMarried {
            age,
            status: marital_status,
        });
    }

    if age <= 19 && occupation != STUDENT && occupation != PART_TIME {
        violations.push(Violation::TeenOccupation {
            age,
            occupation: occupation.to_string(),
        });
    }
    if occupation == STUDENT && age > STUDENT_MAX_AGE {
        violations.push(Violation::StudentTooOld { age });
    }
    if CREDENTIALED.contains(&occupation) && !education.is_university_or_higher() {
        violations.push(Violation::CredentialRequired {
            occupation: occupation.to_string(),
        });
    }

    if age <= 19 && income > MINOR_INCOME_CAP {
        violations.push(Violation::MinorIncome { age, income });
    }
    if occupation == STUDENT && income > STUDENT_INCOME_CAP {
        violations.push(Violation::StudentIncome { income });
    }

    ValidationReport { violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::occupations::UNIVERSITY_STUDENT;
    use crate::models::{GenerationAttempt, Gender};

    fn persona(
        age: u32,
        education: EducationLevel,
        marital: MaritalStatus,
        occupation: &str,
        income: u64,
    ) -> Persona {
        Persona {
            age,
            gender: Gender::Male,
            education,
            marital_status: marital,
            occupation: occupation.to_string(),
            income,
            location: "서울특별시".to_string(),
            generation_attempt: GenerationAttempt::Attempt(1),
        }
    }

    #[test]
    fn test_consistent_persona_passes() {
        let table = ConstraintTable::standard();
        let p = persona(35, EducationLevel::University, MaritalStatus::Married, "사무직", 4_000_000);
        let report = validate_persona(&table, &p);
        assert!(report.is_valid(), "{:?}", report.errors());
    }

    #[test]
    fn test_underage_married_student_collects_all_errors() {
        let table = ConstraintTable::standard();
        let p = persona(
            13,
            EducationLevel::University,
            MaritalStatus::Married,
            UNIVERSITY_STUDENT,
            500_000,
        );
        let report = validate_persona(&table, &p);
        assert!(!report.is_valid());
        assert!(report.violations.contains(&Violation::UnsupportedAge { age: 13 }));
        assert!(report.violations.contains(&Violation::MinorWithDegree { age: 13 }));
        assert!(report.violations.iter().any(|v| matches!(v, Violation::MinorMarried { .. })));
        assert!(report.errors().len() >= 3);
    }

    #[test]
    fn test_credentialed_occupation_needs_degree() {
        let table = ConstraintTable::standard();
        let p = persona(45, EducationLevel::HighSchool, MaritalStatus::Married, "판사", 6_000_000);
        let report = validate_persona(&table, &p);
        assert_eq!(
            report.violations,
            vec![Violation::CredentialRequired { occupation: "판사".into() }]
        );
    }

    #[test]
    fn test_student_rules() {
        let table = ConstraintTable::standard();
        let old = persona(35, EducationLevel::Master, MaritalStatus::Single, STUDENT, 500_000);
        assert!(validate_persona(&table, &old)
            .violations
            .contains(&Violation::StudentTooOld { age: 35 }));

        let rich = persona(
            21,
            EducationLevel::University,
            MaritalStatus::Single,
            STUDENT,
            1_500_000,
        );
        assert_eq!(
            validate_persona(&table, &rich).violations,
            vec![Violation::StudentIncome { income: 1_500_000 }]
        );
    }

    #[test]
    fn test_young_graduate_degrees() {
        let table = ConstraintTable::standard();
        let p = persona(24, EducationLevel::Doctorate, MaritalStatus::Single, "연구원", 2_500_000);
        let violations = validate_persona(&table, &p).violations;
        assert!(violations.contains(&Violation::TooYoungForDoctorate { age: 24 }));
        assert!(violations.iter().any(|v| matches!(v, Violation::EducationForAge { .. })));
    }

    #[test]
    fn test_teen_occupation_and_income() {
        let table = ConstraintTable::standard();
        let p = persona(18, EducationLevel::HighSchool, MaritalStatus::Single, "사무직", 2_500_000);
        let violations = validate_persona(&table, &p).violations;
        assert!(violations.iter().any(|v| matches!(v, Violation::TeenOccupation { .. })));
        assert!(violations.iter().any(|v| matches!(v, Violation::MinorIncome { .. })));
        assert!(violations.iter().any(|v| matches!(v, Violation::IncomeForAge { .. })));
    }

    #[test]
    fn test_into_parts() {
        let table = ConstraintTable::standard();
        let p = persona(40, EducationLevel::College, MaritalStatus::Divorced, "간호사", 3_000_000);
        let (ok, errors) = validate_persona(&table, &p).into_parts();
        assert!(ok);
        assert!(errors.is_empty());
    }
}
