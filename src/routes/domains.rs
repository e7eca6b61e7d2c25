use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::Permission;
use crate::models::common::ClassSessionQuery;
use crate::models::domains::requests::{AffectiveRatingRequest, PsychomotorRatingRequest};
use crate::services::DomainService;

// 懒加载的全局 DOMAIN_SERVICE 实例
static DOMAIN_SERVICE: Lazy<DomainService> = Lazy::new(DomainService::new_lazy);

pub async fn rate_affective(
    req: HttpRequest,
    rating: web::Json<AffectiveRatingRequest>,
) -> ActixResult<HttpResponse> {
    DOMAIN_SERVICE
        .rate_affective(&req, rating.into_inner())
        .await
}

pub async fn rate_psychomotor(
    req: HttpRequest,
    rating: web::Json<PsychomotorRatingRequest>,
) -> ActixResult<HttpResponse> {
    DOMAIN_SERVICE
        .rate_psychomotor(&req, rating.into_inner())
        .await
}

pub async fn list_domains(
    req: HttpRequest,
    query: web::Query<ClassSessionQuery>,
) -> ActixResult<HttpResponse> {
    DOMAIN_SERVICE.list(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_domain_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/domains")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    // 班主任评定；归属校验在服务层
                    .wrap(middlewares::RequirePermission::new(Permission::RateDomains))
                    .route("", web::get().to(list_domains))
                    .route("/affective", web::put().to(rate_affective))
                    .route("/psychomotor", web::put().to(rate_psychomotor)),
            ),
    );
}
