use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ResultService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::notifications::entities::NotificationType;
use crate::models::notifications::requests::NewNotification;
use crate::models::results::entities::ResultStatus;
use crate::models::results::requests::{ApproveResultsRequest, RejectResultsRequest};
use crate::models::results::responses::BatchTransitionResponse;
use crate::models::users::entities::{User, UserRole};
use crate::services::access::{checked_session, ensure_admin, load_class};
use crate::services::{current_user, error_response};

async fn notify_teachers(context: &SchoolContext, notice: NewNotification) {
    if let Err(e) = context.storage().create_notification(notice).await {
        warn!("Failed to notify teachers about result review: {}", e);
    }
}

/// 审核通过已提交的批次
pub async fn approve_results(
    context: &SchoolContext,
    user: &User,
    request: ApproveResultsRequest,
) -> Result<BatchTransitionResponse> {
    ensure_admin(user)?;
    let session = checked_session(request.term, &request.academic_year)?;
    let class = load_class(context, request.class_id).await?;

    let updated = context
        .storage()
        .approve_result_batch(class.id, &session, user.id)
        .await?;

    info!(
        "Results for class {} ({} term, {}) approved by admin {}: {} row(s)",
        class.id, session.term, session.academic_year, user.id, updated
    );

    notify_teachers(
        context,
        NewNotification {
            title: format!("Results approved: {}", class.name),
            message: format!(
                "{} results for the {} term of {} have been approved.",
                class.name, session.term, session.academic_year
            ),
            notification_type: NotificationType::Success,
            target_audience: UserRole::TEACHER.to_string(),
            created_by: Some(user.id),
        },
    )
    .await;

    Ok(BatchTransitionResponse {
        class_id: class.id,
        updated,
        status: ResultStatus::Approved,
    })
}

/// 驳回已提交的批次，驳回原因必填
pub async fn reject_results(
    context: &SchoolContext,
    user: &User,
    request: RejectResultsRequest,
) -> Result<BatchTransitionResponse> {
    ensure_admin(user)?;
    let session = checked_session(request.term, &request.academic_year)?;
    let reason = request.reason.trim();
    if reason.is_empty() {
        return Err(SchoolHubError::validation(
            "A reason is required to reject results",
        ));
    }
    let class = load_class(context, request.class_id).await?;

    let (updated, unlocked) = context
        .storage()
        .reject_result_batch(class.id, &session, reason, request.unlock_scores)
        .await?;

    info!(
        "Results for class {} ({} term, {}) rejected by admin {}: {} row(s), {} score(s) unlocked",
        class.id, session.term, session.academic_year, user.id, updated, unlocked
    );

    notify_teachers(
        context,
        NewNotification {
            title: format!("Results rejected: {}", class.name),
            message: format!(
                "{} results for the {} term of {} were returned for correction: {}",
                class.name, session.term, session.academic_year, reason
            ),
            notification_type: NotificationType::Warning,
            target_audience: UserRole::TEACHER.to_string(),
            created_by: Some(user.id),
        },
    )
    .await;

    Ok(BatchTransitionResponse {
        class_id: class.id,
        updated,
        status: ResultStatus::Rejected,
    })
}

pub async fn handle_approve(
    service: &ResultService,
    request: &HttpRequest,
    approve: ApproveResultsRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match approve_results(&context, &user, approve).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Results approved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to approve results")),
    }
}

pub async fn handle_reject(
    service: &ResultService,
    request: &HttpRequest,
    reject: RejectResultsRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match reject_results(&context, &user, reject).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Results rejected",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to reject results")),
    }
}
