use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::context::SchoolContext;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::notifications::requests::NotificationListQuery;
use crate::models::notifications::responses::NotificationListResponse;
use crate::models::users::entities::User;
use crate::services::{current_user, error_response};

/// 按角色投递：本角色与全体通知，最新在前
pub async fn list_notifications(
    context: &SchoolContext,
    user: &User,
    query: NotificationListQuery,
) -> Result<NotificationListResponse> {
    context
        .storage()
        .list_notifications_for_role(user.role, query.pagination)
        .await
}

pub async fn handle_list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationListQuery,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match list_notifications(&context, &user, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list notifications")),
    }
}
