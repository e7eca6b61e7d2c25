use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::ScoreService;
use crate::context::SchoolContext;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::scores::requests::UnlockScoresRequest;
use crate::models::scores::responses::UnlockScoresResponse;
use crate::models::users::entities::User;
use crate::services::access::{ensure_admin, load_assignment};
use crate::services::{current_user, error_response};

/// 管理员将已提交的成绩表退回草稿，班级统计与单科名次一并清空
pub async fn unlock_scores(
    context: &SchoolContext,
    user: &User,
    unlock: UnlockScoresRequest,
) -> Result<UnlockScoresResponse> {
    ensure_admin(user)?;
    let assignment = load_assignment(context, unlock.assignment_id).await?;

    let unlocked = context.storage().unlock_scores(&[assignment.id]).await?;
    warn!(
        "Scores for assignment {} ({}) unlocked by admin {}: {} row(s)",
        assignment.id, assignment.subject_name, user.id, unlocked
    );

    Ok(UnlockScoresResponse {
        assignment_id: assignment.id,
        unlocked,
    })
}

pub async fn handle_unlock(
    service: &ScoreService,
    request: &HttpRequest,
    unlock: UnlockScoresRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match unlock_scores(&context, &user, unlock).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Scores unlocked successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to unlock scores")),
    }
}
