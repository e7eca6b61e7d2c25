use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::Term;
use crate::models::scores::entities::SubjectScoreSnapshot;

// 成绩单状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum ResultStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl ResultStatus {
    pub const DRAFT: &'static str = "draft";
    pub const SUBMITTED: &'static str = "submitted";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Draft => Self::DRAFT,
            ResultStatus::Submitted => Self::SUBMITTED,
            ResultStatus::Approved => Self::APPROVED,
            ResultStatus::Rejected => Self::REJECTED,
        }
    }

    /// 已提交或已审核的成绩单不可重新汇总，相关评分也不可修改
    pub fn is_locked(&self) -> bool {
        matches!(self, ResultStatus::Submitted | ResultStatus::Approved)
    }
}

impl<'de> Deserialize<'de> for ResultStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ResultStatus::DRAFT => Ok(ResultStatus::Draft),
            ResultStatus::SUBMITTED => Ok(ResultStatus::Submitted),
            ResultStatus::APPROVED => Ok(ResultStatus::Approved),
            ResultStatus::REJECTED => Ok(ResultStatus::Rejected),
            _ => Err(format!("Invalid result status: {s}")),
        }
    }
}

/// 学生某学期的成绩单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct CompiledResult {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub subject_scores: Vec<SubjectScoreSnapshot>,
    pub affective_id: i64,
    pub psychomotor_id: i64,
    pub total_score: f64,
    pub average_score: f64,
    pub class_average: f64,
    pub position: Option<i64>,
    pub total_students: i64,
    pub subjects_count: i64,
    pub teacher_comment: String,
    pub status: ResultStatus,
    pub compiled_by: i64,
    pub compiled_at: chrono::DateTime<chrono::Utc>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub rejection_reason: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 写入存储层的成绩单行
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledResultWrite {
    pub student_id: i64,
    pub subject_scores: Vec<SubjectScoreSnapshot>,
    pub affective_id: i64,
    pub psychomotor_id: i64,
    pub total_score: f64,
    pub average_score: f64,
    pub class_average: f64,
    pub position: Option<i64>,
    pub total_students: i64,
    pub subjects_count: i64,
    pub teacher_comment: String,
}

/// 成绩单批次（班级 × 学期 × 学年）的整体状态
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct BatchState {
    pub status: ResultStatus,
    pub rejection_reason: Option<String>,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_statuses() {
        assert!(ResultStatus::Submitted.is_locked());
        assert!(ResultStatus::Approved.is_locked());
        assert!(!ResultStatus::Rejected.is_locked());
        assert!(!ResultStatus::Draft.is_locked());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "rejected".parse::<ResultStatus>().unwrap(),
            ResultStatus::Rejected
        );
        assert!("pending".parse::<ResultStatus>().is_err());
    }
}
