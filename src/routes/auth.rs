use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::LoginRequest;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(&req, user_data.into_inner()).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/login", web::post().to(login))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(me)),
            ),
    );
}
