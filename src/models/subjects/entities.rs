use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::Term;

/// 科目分配：某位教师在某学期、学年负责某班级的某一科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectAssignment {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_name: String,
    pub term: Term,
    pub academic_year: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

