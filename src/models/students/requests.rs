use serde::Deserialize;
use ts_rs::TS;

// 新增学生请求（管理员）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub admission_number: String,
}
