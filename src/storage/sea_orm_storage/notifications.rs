//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo, PaginationQuery,
    notifications::{
        entities::{AUDIENCE_ALL, Notification},
        requests::NewNotification,
        responses::NotificationListResponse,
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(&self, req: NewNotification) -> Result<Notification> {
        let model = ActiveModel {
            title: Set(req.title),
            message: Set(req.message),
            notification_type: Set(req.notification_type.to_string()),
            target_audience: Set(req.target_audience),
            created_by: Set(req.created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 某角色可见的通知（本角色 + 全体）
    pub async fn list_notifications_for_role_impl(
        &self,
        role: UserRole,
        query: PaginationQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = query.clamped();

        let select = Notifications::find()
            .filter(Column::TargetAudience.is_in([role.as_str(), AUDIENCE_ALL]))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知页数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(NotificationListResponse {
            items: items.into_iter().map(|m| m.into_notification()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}
