use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})/(\d{4})$").expect("valid academic year regex"));

// 学期
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub enum Term {
    First,
    Second,
    Third,
}

impl Term {
    pub const FIRST: &'static str = "first";
    pub const SECOND: &'static str = "second";
    pub const THIRD: &'static str = "third";

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::First => Self::FIRST,
            Term::Second => Self::SECOND,
            Term::Third => Self::THIRD,
        }
    }
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid term: '{s}'. Supported terms: first, second, third"
            ))
        })
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Term::FIRST => Ok(Term::First),
            Term::SECOND => Ok(Term::Second),
            Term::THIRD => Ok(Term::Third),
            _ => Err(format!("Invalid term: {s}")),
        }
    }
}

/// 学期 + 学年，成绩单汇总、评分以及科目分配都按此划分
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct AcademicSession {
    pub term: Term,
    pub academic_year: String,
}

impl AcademicSession {
    pub fn new(term: Term, academic_year: impl Into<String>) -> Result<Self, String> {
        let academic_year = academic_year.into();
        validate_academic_year(&academic_year)?;
        Ok(Self {
            term,
            academic_year,
        })
    }
}

// 班级 + 学期 + 学年查询参数（评分、成绩单共用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct ClassSessionQuery {
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
}


/// 学年格式为 `YYYY/YYYY`，且后一年必须紧接前一年
pub fn validate_academic_year(value: &str) -> Result<(), String> {
    let caps = ACADEMIC_YEAR_RE
        .captures(value)
        .ok_or_else(|| format!("Academic year '{value}' must look like 2024/2025"))?;
    let start: i32 = caps[1]
        .parse()
        .map_err(|_| format!("Invalid academic year: {value}"))?;
    let end: i32 = caps[2]
        .parse()
        .map_err(|_| format!("Invalid academic year: {value}"))?;
    if end != start + 1 {
        return Err(format!(
            "Academic year '{value}' must span two consecutive years"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_parse_and_display() {
        assert_eq!("second".parse::<Term>().unwrap(), Term::Second);
        assert!("fourth".parse::<Term>().is_err());
        assert_eq!(Term::Third.to_string(), "third");
        let term: Term = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(term, Term::First);
    }

    #[test]
    fn test_academic_year_validation() {
        assert!(validate_academic_year("2024/2025").is_ok());
        assert!(validate_academic_year("2024/2026").is_err());
        assert!(validate_academic_year("2024-2025").is_err());
        assert!(validate_academic_year("24/25").is_err());
        assert!(AcademicSession::new(Term::First, "2025/2026").is_ok());
    }
}
