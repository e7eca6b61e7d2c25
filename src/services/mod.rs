pub(crate) mod access;
pub mod auth;
pub mod classes;
pub mod domains;
pub mod notifications;
pub mod results;
pub mod scores;
pub mod users;

pub use auth::AuthService;
pub use classes::ClassService;
pub use domains::DomainService;
pub use notifications::NotificationService;
pub use results::ResultService;
pub use scores::ScoreService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{error, warn};

use crate::context::SchoolContext;
use crate::errors::SchoolHubError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 从 app data 中获取应用状态
pub(crate) fn context_from_request(request: &HttpRequest) -> ActixResult<SchoolContext> {
    request
        .app_data::<web::Data<SchoolContext>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("School context not configured"))
}

/// 当前登录用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

/// 将业务错误映射为 HTTP 响应
///
/// - 校验错误 → 400，原样返回消息
/// - 权限 → 401/403，资源不存在 → 404
/// - 冲突（已提交、已锁定、状态不允许） → 409，原样返回消息；唯一索引冲突 → 409
/// - 其余（存储层、序列化等）→ 500，记录详情并返回 `fallback`
pub(crate) fn error_response(err: &SchoolHubError, fallback: &str) -> HttpResponse {
    let code = ErrorCode::from(err);
    match err {
        SchoolHubError::Validation(msg) | SchoolHubError::ScoreOutOfRange(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg.as_str()))
        }
        SchoolHubError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(code, msg.as_str()))
        }
        SchoolHubError::Authentication(msg) => {
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(code, msg.as_str()))
        }
        SchoolHubError::Authorization(msg) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(code, msg.as_str()))
        }
        SchoolHubError::ResultsIncomplete(msg) => {
            HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(code, msg.as_str()))
        }
        SchoolHubError::AlreadyExists(_) => {
            warn!("{}: {}", fallback, err);
            HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Resource already exists",
            ))
        }
        _ if err.is_conflict() => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(code, err.message()))
        }
        _ => {
            error!("{}: {}", fallback, err);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::InternalServerError, fallback))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_taxonomy_status_codes() {
        let cases = [
            (SchoolHubError::score_out_of_range("ca1"), StatusCode::BAD_REQUEST),
            (SchoolHubError::validation("bad"), StatusCode::BAD_REQUEST),
            (SchoolHubError::not_found("x"), StatusCode::NOT_FOUND),
            (SchoolHubError::authorization("x"), StatusCode::FORBIDDEN),
            (SchoolHubError::results_incomplete("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (SchoolHubError::score_locked("x"), StatusCode::CONFLICT),
            (SchoolHubError::results_already_submitted("x"), StatusCode::CONFLICT),
            (SchoolHubError::invalid_transition("x"), StatusCode::CONFLICT),
            (SchoolHubError::already_exists("x"), StatusCode::CONFLICT),
            (
                SchoolHubError::database_operation("disk full"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err, "Request failed").status(), status, "{err}");
        }
    }
}
