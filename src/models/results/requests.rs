use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::Term;

// 单个学生的班主任评语
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct StudentComment {
    pub student_id: i64,
    pub comment: String,
}

// 汇总提交请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct CompileResultsRequest {
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    #[serde(default)]
    pub comments: Vec<StudentComment>,
    /// 未填写评语的学生按平均分自动生成评语
    #[serde(default)]
    pub auto_comment: bool,
}


// 审核通过请求（管理员）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ApproveResultsRequest {
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
}

// 驳回请求（管理员）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct RejectResultsRequest {
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub reason: String,
    /// 同时将该班级本学期的成绩表退回草稿
    #[serde(default)]
    pub unlock_scores: bool,
}
