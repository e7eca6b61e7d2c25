use serde::Serialize;
use ts_rs::TS;

use super::entities::{CompiledResult, ResultStatus};
use crate::models::common::Term;
use crate::models::scores::entities::SubjectScoreSnapshot;

// 单个学生未满足的汇总条件
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct StudentCompleteness {
    pub student_id: i64,
    pub student_name: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct CompletenessReport {
    pub registered_subjects: i64,
    pub incomplete: Vec<StudentCompleteness>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}

// 预览中的单个学生
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultPreviewRow {
    pub student_id: i64,
    pub student_name: String,
    pub admission_number: String,
    pub subjects: Vec<SubjectScoreSnapshot>,
    pub subjects_count: i64,
    pub total_score: f64,
    pub average_score: f64,
    pub position: Option<i64>,
    pub affective_id: Option<i64>,
    pub psychomotor_id: Option<i64>,
    pub comment: Option<String>,
    pub suggested_comment: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultsPreviewResponse {
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub batch_status: Option<ResultStatus>,
    pub rejection_reason: Option<String>,
    pub total_students: i64,
    pub class_average: f64,
    pub rows: Vec<ResultPreviewRow>,
    pub completeness: CompletenessReport,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct CompileResultsResponse {
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub compiled: usize,
    pub class_average: f64,
    pub status: ResultStatus,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct BatchTransitionResponse {
    pub class_id: i64,
    pub updated: u64,
    pub status: ResultStatus,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListResponse {
    pub items: Vec<CompiledResult>,
}
