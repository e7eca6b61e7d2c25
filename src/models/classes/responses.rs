use super::entities::Class;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 带统计信息的班级
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_count: i64,
    pub subject_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassSummary>,
    pub pagination: PaginationInfo,
}
