use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AuthService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::users::entities::User;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse, UserInfoResponse},
};
use crate::services::{current_user, error_response};
use crate::utils::password::verify_password;

const INVALID_CREDENTIALS: &str = "Username or password is incorrect";

/// 校验用户名（或邮箱）与密码，成功后记录登录时间
pub async fn login(context: &SchoolContext, login_request: &LoginRequest) -> Result<User> {
    let user = context
        .storage()
        .get_user_by_username_or_email(login_request.username.trim())
        .await?
        .ok_or_else(|| SchoolHubError::authentication(INVALID_CREDENTIALS))?;

    if !verify_password(&login_request.password, &user.password_hash) {
        return Err(SchoolHubError::authentication(INVALID_CREDENTIALS));
    }
    if !user.is_active() {
        return Err(SchoolHubError::authentication("Account is inactive"));
    }

    if let Err(e) = context.storage().update_last_login(user.id).await {
        error!("更新最后登录时间失败: {}", e);
    }
    Ok(user)
}

pub async fn handle_login(
    service: &AuthService,
    request: &HttpRequest,
    login_request: LoginRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let config = service.get_config();

    let user = match login(&context, &login_request).await {
        Ok(user) => user,
        Err(SchoolHubError::Authentication(msg)) => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::AuthFailed, msg)));
        }
        Err(e) => return Ok(error_response(&e, "Login failed")),
    };

    match user.generate_access_token() {
        Ok(access_token) => {
            info!("User {} logged in successfully", user.username);
            let response = LoginResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
                permissions: user.role.permissions().to_vec(),
                user,
                created_at: chrono::Utc::now(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let response = UserInfoResponse {
        permissions: user.role.permissions().to_vec(),
        user,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "User information retrieved successfully",
    )))
}
