use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::Term;

/// 评分范围（含两端）
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

// 情感领域评分（班主任录入）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/domain.ts")]
pub struct AffectiveDomain {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub punctuality: i16,
    pub neatness: i16,
    pub politeness: i16,
    pub honesty: i16,
    pub relationship_with_others: i16,
    pub remarks: Option<String>,
    pub rated_by: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 心理运动领域评分（班主任录入）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/domain.ts")]
pub struct PsychomotorDomain {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub handwriting: i16,
    pub verbal_fluency: i16,
    pub games: i16,
    pub sports: i16,
    pub handling_tools: i16,
    pub drawing_painting: i16,
    pub remarks: Option<String>,
    pub rated_by: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/domain.ts")]
pub struct ClassDomainsResponse {
    pub affective: Vec<AffectiveDomain>,
    pub psychomotor: Vec<PsychomotorDomain>,
}
