use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

/// 班级列表查询，search 按班级名模糊匹配
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建班级（管理员），class_teacher_id 须为教师账号
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub class_teacher_id: Option<i64>,
    pub description: Option<String>,
}
