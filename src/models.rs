use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known occupation labels referenced by the rule tables
pub mod occupations {
    pub const STUDENT: &str = "학생";
    pub const PART_TIME: &str = "아르바이트";
    pub const INTERN: &str = "인턴";
    pub const RETIRED: &str = "은퇴";
    pub const UNEMPLOYED: &str = "무직";
    pub const SELF_EMPLOYED: &str = "자영업";
    pub const OFFICE_WORKER: &str = "사무직";
    pub const ENGINEER: &str = "엔지니어";
    pub const TEACHER: &str = "교사";
    pub const NURSE: &str = "간호사";
    pub const DOCTOR: &str = "의사";
    pub const LAWYER: &str = "변호사";
    pub const PROFESSOR: &str = "교수";
    pub const JUDGE: &str = "판사";
    pub const PROSECUTOR: &str = "검사";
    pub const UNIVERSITY_STUDENT: &str = "대학생";

    /// Occupations that require a university degree or higher
    pub const CREDENTIALED: [&str; 5] = [DOCTOR, LAWYER, PROFESSOR, JUDGE, PROSECUTOR];
}

/// Gender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    #[serde(rename = "남성")]
    Male,
    #[serde(rename = "여성")]
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Label used by the census tables ("남자"/"여자" are accepted on input)
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            "남성" | "남자" | "남" | "Male" | "MALE" => Some(Gender::Male),
            "여성" | "여자" | "여" | "Female" | "FEMALE" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Education level, ordered from lowest to highest attainment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EducationLevel {
    #[serde(rename = "중학교")]
    MiddleSchool,
    #[serde(rename = "고등학교")]
    HighSchool,
    /// Two/three-year college
    #[serde(rename = "대학(4년제 미만)")]
    College,
    /// Four-year university
    #[serde(rename = "대학교(4년제 이상)")]
    University,
    #[serde(rename = "대학원(석사 과정)")]
    Master,
    #[serde(rename = "대학원(박사 과정)")]
    Doctorate,
}

impl EducationLevel {
    /// All levels in census column order
    pub const ALL: [EducationLevel; 6] = [
        EducationLevel::MiddleSchool,
        EducationLevel::HighSchool,
        EducationLevel::College,
        EducationLevel::University,
        EducationLevel::Master,
        EducationLevel::Doctorate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::MiddleSchool => "중학교",
            EducationLevel::HighSchool => "고등학교",
            EducationLevel::College => "대학(4년제 미만)",
            EducationLevel::University => "대학교(4년제 이상)",
            EducationLevel::Master => "대학원(석사 과정)",
            EducationLevel::Doctorate => "대학원(박사 과정)",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|level| level.label() == s)
    }

    /// Column index in the reference table
    pub fn index(&self) -> usize {
        match self {
            EducationLevel::MiddleSchool => 0,
            EducationLevel::HighSchool => 1,
            EducationLevel::College => 2,
            EducationLevel::University => 3,
            EducationLevel::Master => 4,
            EducationLevel::Doctorate => 5,
        }
    }

    pub fn is_university_or_higher(&self) -> bool {
        matches!(
            self,
            EducationLevel::University | EducationLevel::Master | EducationLevel::Doctorate
        )
    }

    pub fn is_graduate(&self) -> bool {
        matches!(self, EducationLevel::Master | EducationLevel::Doctorate)
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marital status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaritalStatus {
    #[serde(rename = "미혼")]
    Single,
    #[serde(rename = "기혼")]
    Married,
    #[serde(rename = "이혼")]
    Divorced,
    #[serde(rename = "사별")]
    Widowed,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 4] = [
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Divorced,
        MaritalStatus::Widowed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "미혼",
            MaritalStatus::Married => "기혼",
            MaritalStatus::Divorced => "이혼",
            MaritalStatus::Widowed => "사별",
        }
    }

    /// Accepts both persona labels and census labels ("유배우" = married)
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            "미혼" => Some(MaritalStatus::Single),
            "기혼" | "유배우" => Some(MaritalStatus::Married),
            "이혼" => Some(MaritalStatus::Divorced),
            "사별" => Some(MaritalStatus::Widowed),
            _ => None,
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which attempt produced a persona
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "AttemptRepr", into = "AttemptRepr")]
pub enum GenerationAttempt {
    /// Accepted on the n-th sampling attempt (1-based)
    Attempt(u32),
    /// Produced by the safe fallback path
    Fallback,
}

impl GenerationAttempt {
    pub fn is_fallback(&self) -> bool {
        matches!(self, GenerationAttempt::Fallback)
    }
}

/// Wire shape: the attempt number, or the string "fallback"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AttemptRepr {
    Number(u32),
    Label(String),
}

impl From<GenerationAttempt> for AttemptRepr {
    fn from(attempt: GenerationAttempt) -> Self {
        match attempt {
            GenerationAttempt::Attempt(n) => AttemptRepr::Number(n),
            GenerationAttempt::Fallback => AttemptRepr::Label("fallback".to_string()),
        }
    }
}

impl TryFrom<AttemptRepr> for GenerationAttempt {
    type Error = String;

    fn try_from(repr: AttemptRepr) -> Result<Self, Self::Error> {
        match repr {
            AttemptRepr::Number(n) => Ok(GenerationAttempt::Attempt(n)),
            AttemptRepr::Label(s) if s == "fallback" => Ok(GenerationAttempt::Fallback),
            AttemptRepr::Label(s) => Err(format!("unknown generation attempt: {s}")),
        }
    }
}

impl fmt::Display for GenerationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationAttempt::Attempt(n) => write!(f, "{n}"),
            GenerationAttempt::Fallback => f.write_str("fallback"),
        }
    }
}

/// Hierarchically generated persona
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    pub age: u32,
    pub gender: Gender,
    pub education: EducationLevel,
    pub marital_status: MaritalStatus,
    pub occupation: String,
    /// Monthly income in KRW
    pub income: u64,
    pub location: String,
    pub generation_attempt: GenerationAttempt,
}

/// Flattened row for CSV output
#[derive(Debug, Clone, Serialize)]
pub struct PersonaRow<'a> {
    pub age: u32,
    pub gender: &'static str,
    pub education: &'static str,
    pub marital_status: &'static str,
    pub occupation: &'a str,
    pub income: u64,
    pub location: &'a str,
    pub generation_attempt: String,
}

impl Persona {
    pub fn to_row(&self) -> PersonaRow<'_> {
        PersonaRow {
            age: self.age,
            gender: self.gender.label(),
            education: self.education.label(),
            marital_status: self.marital_status.label(),
            occupation: &self.occupation,
            income: self.income,
            location: &self.location,
            generation_attempt: self.generation_attempt.to_string(),
        }
    }
}
