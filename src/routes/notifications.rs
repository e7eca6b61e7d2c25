use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::Permission;
use crate::models::notifications::requests::NotificationListQuery;
use crate::services::NotificationService;

// 懒加载的全局 NOTIFICATION_SERVICE 实例
static NOTIFICATION_SERVICE: Lazy<NotificationService> =
    Lazy::new(NotificationService::new_lazy);

pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .list_notifications(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_notifications)
                        .wrap(middlewares::RequirePermission::new(Permission::ViewNotifications)),
                ),
            ),
    );
}
