use serde::Deserialize;
use ts_rs::TS;

use super::entities::NotificationType;
use crate::models::common::PaginationQuery;

// 通知列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

/// 新建通知（由业务流程发出）
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub target_audience: String,
    pub created_by: Option<i64>,
}
