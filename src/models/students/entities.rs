use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum StudentStatus {
    Active,
    Inactive,
}

impl<'de> Deserialize<'de> for StudentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Active => write!(f, "active"),
            StudentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StudentStatus::Active),
            "inactive" => Ok(StudentStatus::Inactive),
            _ => Err(format!("Invalid student status: {s}")),
        }
    }
}

// 学生实体（成绩模块只读）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub class_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub admission_number: String,
    pub status: StudentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
