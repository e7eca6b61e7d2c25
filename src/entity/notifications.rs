//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub notification_type: String,
    pub target_audience: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::notifications::entities::{Notification, NotificationType};

        Notification {
            id: self.id,
            title: self.title,
            message: self.message,
            notification_type: self
                .notification_type
                .parse::<NotificationType>()
                .unwrap_or(NotificationType::Info),
            target_audience: self.target_audience,
            created_by: self.created_by,
            created_at: super::from_timestamp(self.created_at),
        }
    }
}
