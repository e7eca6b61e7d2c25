use serde::Serialize;
use ts_rs::TS;

use super::entities::{Grade, ScoreStatus};
use crate::models::subjects::entities::SubjectAssignment;

// 成绩表整体状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub enum SheetStatus {
    Empty,
    Draft,
    Submitted,
}

// 成绩表中的一行（每个在读学生一行）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreSheetRow {
    pub student_id: i64,
    pub student_name: String,
    pub admission_number: String,
    pub ca1: Option<f64>,
    pub ca2: Option<f64>,
    pub exam: Option<f64>,
    pub total: Option<f64>,
    pub grade: Option<Grade>,
    pub remark: Option<String>,
    pub status: Option<ScoreStatus>,
    pub subject_position: Option<i64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreSheetResponse {
    pub assignment: SubjectAssignment,
    pub status: SheetStatus,
    pub class_average: Option<f64>,
    pub class_min: Option<f64>,
    pub class_max: Option<f64>,
    pub rows: Vec<ScoreSheetRow>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct DraftSaveResponse {
    pub saved: usize,
    pub ignored: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreSubmitResponse {
    pub assignment_id: i64,
    pub submitted: usize,
    pub class_average: f64,
    pub class_min: f64,
    pub class_max: f64,
}

// 提交时缺失成绩的学生
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct MissingScore {
    pub student_id: i64,
    pub student_name: String,
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreCompletenessReport {
    pub assignment_id: i64,
    pub missing: Vec<MissingScore>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct UnlockScoresResponse {
    pub assignment_id: i64,
    pub unlocked: u64,
}

// 导入错误行
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ImportRowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreImportResponse {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}
