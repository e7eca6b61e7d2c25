use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::ensure_admin;
use crate::services::{current_user, error_response};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_display_name, validate_email, validate_password, validate_username,
};

/// 家长账号必须关联一名已存在的学生
async fn check_linked_student(
    context: &SchoolContext,
    user_data: &CreateUserRequest,
) -> Result<()> {
    if user_data.role != UserRole::Parent {
        return Ok(());
    }
    let student_id = user_data.linked_id.ok_or_else(|| {
        SchoolHubError::validation("Parent accounts must be linked to a student")
    })?;
    match context.storage().get_student_by_id(student_id).await? {
        Some(_) => Ok(()),
        None => Err(SchoolHubError::not_found(format!(
            "Student {student_id} not found"
        ))),
    }
}

/// 管理员创建账号
pub async fn create_user(
    context: &SchoolContext,
    user: &User,
    mut user_data: CreateUserRequest,
) -> Result<User> {
    ensure_admin(user)?;
    validate_username(&user_data.username).map_err(SchoolHubError::validation)?;
    validate_email(&user_data.email).map_err(SchoolHubError::validation)?;
    validate_password(&user_data.password).map_err(SchoolHubError::validation)?;
    if let Some(name) = &user_data.display_name {
        validate_display_name("Display name", name, 64).map_err(SchoolHubError::validation)?;
    }
    check_linked_student(context, &user_data).await?;

    user_data.password = hash_password(&user_data.password)?;

    let created = context.storage().create_user(user_data).await?;
    info!(
        "User {} ({}) created by {}",
        created.username, created.role, user.id
    );
    Ok(created)
}

pub async fn handle_create_user(
    service: &UserService,
    request: &HttpRequest,
    user_data: CreateUserRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match create_user(&context, &user, user_data).await {
        Ok(created) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(created, "User created successfully"))),
        Err(SchoolHubError::AlreadyExists(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username or email already exists",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to create user")),
    }
}
