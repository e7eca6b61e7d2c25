use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Info => write!(f, "info"),
            NotificationType::Success => write!(f, "success"),
            NotificationType::Warning => write!(f, "warning"),
            NotificationType::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(NotificationType::Info),
            "success" => Ok(NotificationType::Success),
            "warning" => Ok(NotificationType::Warning),
            "error" => Ok(NotificationType::Error),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

/// 面向全体用户的通知受众
pub const AUDIENCE_ALL: &str = "all";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    /// 角色名或 `all`
    pub target_audience: String,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
