use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::classes::entities::Class;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::ensure_admin;
use crate::services::{current_user, error_response};
use crate::utils::validate::validate_display_name;

/// 班主任必须是教师账号
pub(crate) async fn ensure_teacher_account(context: &SchoolContext, teacher_id: i64) -> Result<()> {
    match context.storage().get_user_by_id(teacher_id).await? {
        Some(user) if user.role == UserRole::Teacher => Ok(()),
        Some(_) => Err(SchoolHubError::validation(format!(
            "User {teacher_id} is not a teacher"
        ))),
        None => Err(SchoolHubError::not_found(format!(
            "Teacher {teacher_id} not found"
        ))),
    }
}

pub async fn create_class(
    context: &SchoolContext,
    user: &User,
    mut class_data: CreateClassRequest,
) -> Result<Class> {
    ensure_admin(user)?;
    validate_display_name("Class name", &class_data.name, 64).map_err(SchoolHubError::validation)?;
    class_data.name = class_data.name.trim().to_string();

    if let Some(teacher_id) = class_data.class_teacher_id {
        ensure_teacher_account(context, teacher_id).await?;
    }

    let class = context.storage().create_class(class_data).await?;
    info!("Class {} created by {}", class.name, user.id);
    Ok(class)
}

pub async fn handle_create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let name = class_data.name.clone();

    match create_class(&context, &user, class_data).await {
        Ok(class) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(class, "Class created successfully"))),
        Err(SchoolHubError::AlreadyExists(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyExists,
                format!("Class '{}' already exists", name.trim()),
            )))
        }
        Err(e) => Ok(error_response(&e, "Class creation failed")),
    }
}
