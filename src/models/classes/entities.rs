use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 班主任（用户ID）
    pub class_teacher_id: Option<i64>,
    // 班级描述
    pub description: Option<String>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn is_class_teacher(&self, user_id: i64) -> bool {
        self.class_teacher_id == Some(user_id)
    }
}
