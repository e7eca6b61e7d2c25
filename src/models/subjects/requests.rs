use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::Term;

// 新增科目分配（管理员）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectAssignmentRequest {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_name: String,
    pub term: Term,
    pub academic_year: String,
}

// 班级科目查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct ClassSubjectsQuery {
    pub term: Term,
    pub academic_year: String,
}
