use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }

    pub fn remark(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::B => "Very Good",
            Grade::C => "Good",
            Grade::D => "Fair",
            Grade::E => "Poor",
            Grade::F => "Very Poor",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            "F" => Ok(Grade::F),
            _ => Err(format!("Invalid grade: {s}")),
        }
    }
}

// 成绩状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub enum ScoreStatus {
    Draft,
    Submitted,
}

impl ScoreStatus {
    pub const DRAFT: &'static str = "draft";
    pub const SUBMITTED: &'static str = "submitted";
}

impl<'de> Deserialize<'de> for ScoreStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreStatus::Draft => write!(f, "{}", ScoreStatus::DRAFT),
            ScoreStatus::Submitted => write!(f, "{}", ScoreStatus::SUBMITTED),
        }
    }
}

impl std::str::FromStr for ScoreStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ScoreStatus::DRAFT => Ok(ScoreStatus::Draft),
            ScoreStatus::SUBMITTED => Ok(ScoreStatus::Submitted),
            _ => Err(format!("Invalid score status: {s}")),
        }
    }
}

/// 单科成绩（学生 × 科目分配）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct Score {
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub ca1: Option<f64>,
    pub ca2: Option<f64>,
    pub exam: Option<f64>,
    pub total: f64,
    pub grade: Grade,
    pub remark: String,
    pub status: ScoreStatus,
    pub class_average: Option<f64>,
    pub class_min: Option<f64>,
    pub class_max: Option<f64>,
    pub subject_position: Option<i64>,
    pub entered_by: i64,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Score {
    pub fn is_locked(&self) -> bool {
        self.status == ScoreStatus::Submitted
    }

    pub fn is_complete(&self) -> bool {
        self.ca1.is_some() && self.ca2.is_some() && self.exam.is_some()
    }
}

/// 写入存储层的成绩行（派生字段已由 `derive_score` 计算）
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWrite {
    pub student_id: i64,
    pub ca1: Option<f64>,
    pub ca2: Option<f64>,
    pub exam: Option<f64>,
    pub total: f64,
    pub grade: Grade,
    pub remark: String,
    /// 仅提交时有值
    pub subject_position: Option<i64>,
}

/// 提交时写入的班级统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectStats {
    pub class_average: f64,
    pub class_min: f64,
    pub class_max: f64,
}

/// 成绩单快照中的单科条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SubjectScoreSnapshot {
    pub assignment_id: i64,
    pub subject_name: String,
    pub ca1: f64,
    pub ca2: f64,
    pub exam: f64,
    pub total: f64,
    pub grade: Grade,
    pub remark: String,
    pub class_average: Option<f64>,
    pub subject_position: Option<i64>,
}
