use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::Permission;
use crate::models::scores::requests::{
    SaveDraftRequest, ScoreSheetQuery, SubmitScoresRequest, UnlockScoresRequest,
};
use crate::services::ScoreService;

// 懒加载的全局 SCORE_SERVICE 实例
static SCORE_SERVICE: Lazy<ScoreService> = Lazy::new(ScoreService::new_lazy);

pub async fn get_sheet(
    req: HttpRequest,
    query: web::Query<ScoreSheetQuery>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.get_sheet(&req, query.assignment_id).await
}

pub async fn save_draft(
    req: HttpRequest,
    draft: web::Json<SaveDraftRequest>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.save_draft(&req, draft.into_inner()).await
}

pub async fn submit(
    req: HttpRequest,
    submit: web::Json<SubmitScoresRequest>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.submit(&req, submit.into_inner()).await
}

pub async fn unlock(
    req: HttpRequest,
    unlock: web::Json<UnlockScoresRequest>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.unlock(&req, unlock.into_inner()).await
}

pub async fn export(
    req: HttpRequest,
    query: web::Query<ScoreSheetQuery>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.export(&req, query.assignment_id).await
}

pub async fn import(
    req: HttpRequest,
    query: web::Query<ScoreSheetQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE
        .import(&req, query.assignment_id, payload)
        .await
}

// 配置路由
pub fn configure_score_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/scores")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/unlock").route(
                    web::post()
                        .to(unlock)
                        .wrap(middlewares::RequirePermission::new(Permission::UnlockScores)),
                ),
            )
            .service(
                web::scope("")
                    // 科目教师录入成绩；归属校验在服务层
                    .wrap(middlewares::RequirePermission::new(Permission::EnterScores))
                    .route("/sheet", web::get().to(get_sheet))
                    .route("/draft", web::post().to(save_draft))
                    .route("/submit", web::post().to(submit))
                    .route("/export", web::get().to(export))
                    .route("/import", web::post().to(import)),
            ),
    );
}
