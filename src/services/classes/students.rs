use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::students::entities::Student;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_admin, load_class};
use crate::services::{current_user, error_response};
use crate::utils::validate::{validate_admission_number, validate_display_name};

/// 班级在读学生，按姓名排序
pub async fn list_students(context: &SchoolContext, class_id: i64) -> Result<Vec<Student>> {
    load_class(context, class_id).await?;
    context.class_roster(class_id).await
}

/// 新增学生后刷新花名册缓存
pub async fn add_student(
    context: &SchoolContext,
    user: &User,
    class_id: i64,
    mut student: CreateStudentRequest,
) -> Result<Student> {
    ensure_admin(user)?;
    validate_display_name("First name", &student.first_name, 64)
        .and_then(|_| validate_display_name("Last name", &student.last_name, 64))
        .map_err(SchoolHubError::validation)?;
    student.admission_number = student.admission_number.trim().to_string();
    validate_admission_number(&student.admission_number).map_err(SchoolHubError::validation)?;
    student.first_name = student.first_name.trim().to_string();
    student.last_name = student.last_name.trim().to_string();

    load_class(context, class_id).await?;
    let created = context.storage().create_student(class_id, student).await?;
    context.refresh_class_roster(class_id).await?;

    info!(
        "Student {} ({}) added to class {} by {}",
        created.full_name(),
        created.admission_number,
        class_id,
        user.id
    );
    Ok(created)
}

pub async fn handle_list_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;

    match list_students(&context, class_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            students,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list students")),
    }
}

pub async fn handle_add_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    student: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match add_student(&context, &user, class_id, student).await {
        Ok(student) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(student, "Student added successfully"))),
        Err(SchoolHubError::AlreadyExists(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                "Admission number already exists",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to add student")),
    }
}
