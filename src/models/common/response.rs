use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

// 统一的API响应结构，success 为 false 或非 2xx 状态码即视为失败
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub success: bool,
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_flag() {
        let ok = ApiResponse::success(1_i64, "ok");
        assert!(ok.success);
        assert_eq!(ok.code, 0);

        let err = ApiResponse::error_empty(ErrorCode::ScoreLocked, "locked");
        assert!(!err.success);
        assert_eq!(err.code, ErrorCode::ScoreLocked as i32);

        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["success"], false);
    }
}
