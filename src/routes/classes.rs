use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::Permission;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::subjects::requests::{ClassSubjectsQuery, CreateSubjectAssignmentRequest};
use crate::services::ClassService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn list_students(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_students(&req, class_id.0).await
}

pub async fn add_student(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    student: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .add_student(&req, class_id.0, student.into_inner())
        .await
}

pub async fn list_subjects(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<ClassSubjectsQuery>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .list_subjects(&req, class_id.0, query.into_inner())
        .await
}

pub async fn create_subject_assignment(
    req: HttpRequest,
    assignment: web::Json<CreateSubjectAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_subject_assignment(&req, assignment.into_inner())
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_classes)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewClasses)),
                    )
                    .route(
                        web::post()
                            .to(create_class)
                            // 仅管理员可以创建班级
                            .wrap(middlewares::RequirePermission::new(Permission::ManageClasses)),
                    ),
            )
            .service(
                web::resource("/{class_id}/students")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewStudents)),
                    )
                    .route(
                        web::post()
                            .to(add_student)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageStudents)),
                    ),
            )
            .service(
                web::resource("/{class_id}/subjects").route(
                    web::get()
                        .to(list_subjects)
                        .wrap(middlewares::RequirePermission::new(Permission::ViewClasses)),
                ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/subject-assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_subject_assignment)
                        .wrap(middlewares::RequirePermission::new(Permission::ManageClasses)),
                ),
            ),
    );
}
