use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::Permission;
use crate::models::common::ClassSessionQuery;
use crate::models::results::requests::{
    ApproveResultsRequest, CompileResultsRequest, RejectResultsRequest,
};
use crate::services::ResultService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 RESULT_SERVICE 实例
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn preview(
    req: HttpRequest,
    query: web::Query<ClassSessionQuery>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.preview(&req, query.into_inner()).await
}

pub async fn compile(
    req: HttpRequest,
    compile: web::Json<CompileResultsRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.compile(&req, compile.into_inner()).await
}

pub async fn approve(
    req: HttpRequest,
    approve: web::Json<ApproveResultsRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.approve(&req, approve.into_inner()).await
}

pub async fn reject(
    req: HttpRequest,
    reject: web::Json<RejectResultsRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.reject(&req, reject.into_inner()).await
}

pub async fn list_results(
    req: HttpRequest,
    query: web::Query<ClassSessionQuery>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.list(&req, query.into_inner()).await
}

pub async fn student_results(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.student_results(&req, student_id.0).await
}

// 配置路由
pub fn configure_result_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_results)
                        .wrap(middlewares::RequirePermission::new(Permission::ViewResults)),
                ),
            )
            .service(
                web::resource("/preview").route(
                    web::get()
                        .to(preview)
                        .wrap(middlewares::RequirePermission::new(Permission::CompileResults)),
                ),
            )
            .service(
                web::resource("/compile").route(
                    web::post()
                        .to(compile)
                        .wrap(middlewares::RequirePermission::new(Permission::CompileResults)),
                ),
            )
            .service(
                web::resource("/approve").route(
                    web::post()
                        .to(approve)
                        .wrap(middlewares::RequirePermission::new(Permission::ApproveResults)),
                ),
            )
            .service(
                web::resource("/reject").route(
                    web::post()
                        .to(reject)
                        .wrap(middlewares::RequirePermission::new(Permission::ApproveResults)),
                ),
            )
            .service(
                web::resource("/students/{student_id}").route(
                    web::get()
                        .to(student_results)
                        // 家长只能查看关联学生的已审核成绩单，服务层校验
                        .wrap(middlewares::RequirePermission::new_any(&[
                            Permission::ViewResults,
                            Permission::ViewOwnChildResults,
                        ])),
                ),
            ),
    );
}
