//! Configuration of the flat generator
//!
//! Distributions and vocabularies approximate Statistics Korea and Ministry
//! of the Interior population figures plus common Korean cultural traits.
//! Every field has a default, so a JSON file only needs to override what it
//! changes.

use super::{AgeGroup, FlatEducation, Generation, IncomeBracket, AGE_GROUPS};
use crate::error::{Error, Result};
use crate::models::{Gender, MaritalStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlatConfig {
    /// Year whose demographic trends drive age and region sampling;
    /// `None` uses the distributions below
    pub trend_year: Option<i32>,
    pub age_distribution: Vec<(AgeGroup, f64)>,
    pub gender_ratio: Vec<(Gender, f64)>,
    pub regional_distribution: Vec<(String, f64)>,
    /// Occupation category → occupations
    pub occupations: Vec<(String, Vec<String>)>,
    /// Category weights for ages 20-59
    pub working_age_categories: Vec<(String, f64)>,
    /// Category weights for ages 60 and over
    pub senior_categories: Vec<(String, f64)>,
    pub education_levels: Vec<(FlatEducation, f64)>,
    pub income_brackets: Vec<(IncomeBracket, f64)>,
    pub marital_statuses: Vec<(MaritalStatus, f64)>,
    /// Big Five trait → possible expressions
    pub personality_traits: Vec<(String, Vec<String>)>,
    pub values: Vec<String>,
    pub interests: Vec<String>,
    pub lifestyle_attributes: Vec<String>,
    pub generation_values: Vec<(Generation, Vec<String>)>,
    /// Short region name → lifestyle traits
    pub regional_traits: Vec<(String, Vec<String>)>,
    pub social_relations: Vec<String>,
    pub shopping_habits: Vec<String>,
    pub media_habits: Vec<String>,
    /// Attempts per persona before giving up
    pub max_retries: u32,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weighted(items: &[(&str, f64)]) -> Vec<(String, f64)> {
    items.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

fn has_mass<T>(weights: &[(T, f64)]) -> bool {
    weights.iter().any(|(_, w)| *w > 0.0)
}

fn grouped(items: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
    items
        .iter()
        .map(|(k, values)| (k.to_string(), strings(values)))
        .collect()
}

impl Default for FlatConfig {
    fn default() -> Self {
        let age_shares = [0.08, 0.09, 0.13, 0.14, 0.16, 0.16, 0.12, 0.07, 0.05];

        Self {
            trend_year: Some(super::trends::BASE_YEAR),
            age_distribution: AGE_GROUPS.iter().copied().zip(age_shares).collect(),
            gender_ratio: Gender::ALL.iter().map(|g| (*g, 0.5)).collect(),
            regional_distribution: weighted(&[
                ("서울", 0.18),
                ("부산", 0.06),
                ("대구", 0.05),
                ("인천", 0.06),
                ("광주", 0.03),
                ("대전", 0.03),
                ("울산", 0.02),
                ("세종", 0.007),
                ("경기", 0.26),
                ("강원", 0.03),
                ("충북", 0.03),
                ("충남", 0.04),
                ("전북", 0.03),
                ("전남", 0.03),
                ("경북", 0.05),
                ("경남", 0.06),
                ("제주", 0.01),
            ]),
            occupations: grouped(&[
                ("학생", &["초등학생", "중학생", "고등학생", "대학생", "대학원생"][..]),
                (
                    "직장인",
                    &["사무직", "기술직", "영업/마케팅", "전문직(의사, 변호사 등)", "공무원", "교사"][..],
                ),
                ("자영업자", &["소상공인", "프리랜서", "중소기업 대표"][..]),
                ("주부", &["전업주부", "육아휴직중"][..]),
                ("무직", &["취업준비생", "은퇴자", "기타 무직"][..]),
                ("농림어업", &["농업", "어업", "임업"][..]),
            ]),
            working_age_categories: weighted(&[
                ("직장인", 0.6),
                ("자영업자", 0.15),
                ("무직", 0.1),
                ("주부", 0.1),
                ("농림어업", 0.05),
            ]),
            senior_categories: weighted(&[
                ("무직", 0.5),
                ("자영업자", 0.2),
                ("직장인", 0.2),
                ("농림어업", 0.1),
            ]),
            education_levels: vec![
                (FlatEducation::None, 0.05),
                (FlatEducation::Elementary, 0.05),
                (FlatEducation::Middle, 0.10),
                (FlatEducation::High, 0.30),
                (FlatEducation::Bachelor, 0.40),
                (FlatEducation::Graduate, 0.10),
            ],
            income_brackets: IncomeBracket::ALL.iter().map(|b| (*b, 0.2)).collect(),
            marital_statuses: vec![
                (MaritalStatus::Single, 0.40),
                (MaritalStatus::Married, 0.50),
                (MaritalStatus::Divorced, 0.07),
                (MaritalStatus::Widowed, 0.03),
            ],
            personality_traits: grouped(&[
                ("개방성", &["호기심 많음", "상상력 풍부", "예술적", "틀에 얽매이지 않음", "전통적", "실용적"][..]),
                ("성실성", &["계획적", "조직적", "책임감 강함", "끈기 있음", "충동적", "게으름", "무책임"][..]),
                ("외향성", &["사교적", "활동적", "낙천적", "주도적", "내향적", "조용함", "수동적"][..]),
                ("친화성", &["협조적", "친절함", "공감 능력 뛰어남", "이타적", "비판적", "냉담함", "경쟁적"][..]),
                ("신경증", &["침착함", "안정적", "스트레스에 강함", "불안정", "예민함", "변덕스러움", "우울함"][..]),
            ]),
            values: strings(&[
                "가족", "성공", "안정", "자유", "사회적 기여", "개인 성장", "명예", "재물", "건강", "환경 보호",
            ]),
            interests: strings(&[
                "여행", "요리", "운동", "독서", "영화/드라마", "음악", "게임", "패션/뷰티", "IT/기술", "재테크",
                "봉사활동", "반려동물",
            ]),
            lifestyle_attributes: strings(&[
                "미니멀리스트", "욜로족", "워라밸 중시", "건강 중시", "친환경 지향", "디지털 노마드",
                "가성비 추구", "자기계발 중시", "소확행 추구",
            ]),
            generation_values: vec![
                (
                    Generation::GenZ,
                    strings(&["디지털 네이티브", "개인주의", "다양성 존중", "공정성 중시", "가치소비"]),
                ),
                (
                    Generation::Millennial,
                    strings(&["워라밸", "경험 중시", "사회적 가치", "개성 표현", "재테크 관심"]),
                ),
                (
                    Generation::GenX,
                    strings(&["개성", "합리성", "자기계발", "가족과 개인의 균형", "문화적 개방성"]),
                ),
                (
                    Generation::BabyBoomer,
                    strings(&["가족 중시", "희생", "공동체 의식", "안정 추구", "전통 존중"]),
                ),
            ],
            regional_traits: grouped(&[
                ("서울", &["트렌디", "바쁜", "문화생활", "경쟁적", "다양한 인구"][..]),
                ("부산", &["활기찬", "개방적", "해양문화", "정 많음", "사투리 사용"][..]),
                ("대구", &["보수적", "열정적", "패션", "자부심 강함"][..]),
                ("인천", &["실용적", "국제적", "교통 요충지"][..]),
                ("경기", &["실용적", "교외생활", "다양한 인구", "서울 접근성 중시"][..]),
                ("제주", &["자연친화적", "여유로운", "관광", "이주민 증가"][..]),
            ]),
            social_relations: strings(&[
                "선후배 관계 중시", "체면 중시", "정 문화", "집단주의적 성향", "가족 중심 문화",
            ]),
            shopping_habits: strings(&["온라인 쇼핑 선호", "배달 앱 사용 빈번", "해외 직구", "중고거래 활발"]),
            media_habits: strings(&["유튜브/OTT 시청", "뉴스 앱/포털 이용", "SNS 활발", "웹툰/웹소설 소비"]),
            max_retries: 10,
        }
    }
}

impl FlatConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(Error::InvalidConfig("max_retries must be at least 1".into()));
        }
        if !has_mass(&self.age_distribution) {
            return Err(Error::InvalidConfig("age_distribution has no positive weight".into()));
        }
        if !has_mass(&self.gender_ratio) {
            return Err(Error::InvalidConfig("gender_ratio has no positive weight".into()));
        }
        if !has_mass(&self.marital_statuses) {
            return Err(Error::InvalidConfig("marital_statuses has no positive weight".into()));
        }
        if self.interests.len() < 6 || self.values.len() < 5 {
            return Err(Error::InvalidConfig(
                "need at least 6 interests and 5 values to sample from".into(),
            ));
        }
        if self.lifestyle_attributes.len() < 3 || self.social_relations.len() < 3 {
            return Err(Error::InvalidConfig(
                "need at least 3 lifestyle attributes and 3 social relations".into(),
            ));
        }
        Ok(())
    }

    /// Occupations of a category
    pub fn occupations_in(&self, category: &str) -> Option<&[String]> {
        self.occupations
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, list)| list.as_slice())
    }

    pub fn values_for(&self, generation: Generation) -> &[String] {
        self.generation_values
            .iter()
            .find(|(g, _)| *g == generation)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn traits_for_region(&self, region: &str) -> &[String] {
        self.regional_traits
            .iter()
            .find(|(r, _)| r == region)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }
}
