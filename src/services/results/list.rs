use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::common::ClassSessionQuery;
use crate::models::results::entities::ResultStatus;
use crate::models::results::responses::ResultListResponse;
use crate::models::users::entities::{User, UserRole};
use crate::services::access::{checked_session, ensure_class_teacher, load_class};
use crate::services::{current_user, error_response};

/// 班级某学期的成绩单，按名次排序
pub async fn list_results(
    context: &SchoolContext,
    user: &User,
    query: ClassSessionQuery,
) -> Result<ResultListResponse> {
    let session = checked_session(query.term, &query.academic_year)?;
    let class = load_class(context, query.class_id).await?;
    ensure_class_teacher(user, &class)?;

    let items = context
        .storage()
        .list_compiled_results(class.id, &session)
        .await?;
    Ok(ResultListResponse { items })
}

/// 单个学生的成绩单
///
/// 家长只能查看关联学生已审核通过的成绩单。
pub async fn student_results(
    context: &SchoolContext,
    user: &User,
    student_id: i64,
) -> Result<ResultListResponse> {
    let status = match user.role {
        UserRole::Parent => {
            if user.linked_id != Some(student_id) {
                return Err(SchoolHubError::authorization(
                    "You can only view results for your own child",
                ));
            }
            Some(ResultStatus::Approved)
        }
        UserRole::Admin | UserRole::Teacher => None,
        UserRole::Accountant => {
            return Err(SchoolHubError::authorization(
                "You do not have permission to view results",
            ));
        }
    };

    context
        .storage()
        .get_student_by_id(student_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found(format!("Student {student_id} not found")))?;

    let items = context
        .storage()
        .list_student_results(student_id, status)
        .await?;
    Ok(ResultListResponse { items })
}

pub async fn handle_list(
    service: &ResultService,
    request: &HttpRequest,
    query: ClassSessionQuery,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match list_results(&context, &user, query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            list,
            "Results retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list results")),
    }
}

pub async fn handle_student_results(
    service: &ResultService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match student_results(&context, &user, student_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            list,
            "Results retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to load student results")),
    }
}
