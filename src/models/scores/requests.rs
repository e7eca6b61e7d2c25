use serde::Deserialize;
use ts_rs::TS;

// 成绩表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreSheetQuery {
    pub assignment_id: i64,
}

// 单个学生的成绩输入，缺省字段表示尚未录入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreEntry {
    pub student_id: i64,
    pub ca1: Option<f64>,
    pub ca2: Option<f64>,
    pub exam: Option<f64>,
}

impl ScoreEntry {
    pub fn has_any_value(&self) -> bool {
        self.ca1.is_some() || self.ca2.is_some() || self.exam.is_some()
    }
}

// 保存草稿请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SaveDraftRequest {
    pub assignment_id: i64,
    pub scores: Vec<ScoreEntry>,
}

// 提交成绩请求，可附带最后一批改动，与已保存的草稿合并后校验
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SubmitScoresRequest {
    pub assignment_id: i64,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

// 解锁成绩请求（管理员）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct UnlockScoresRequest {
    pub assignment_id: i64,
}
