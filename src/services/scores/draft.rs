use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScoreService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::scores::entities::ScoreWrite;
use crate::models::scores::requests::{SaveDraftRequest, ScoreEntry};
use crate::models::scores::responses::DraftSaveResponse;
use crate::models::students::entities::Student;
use crate::models::users::entities::User;
use crate::services::access::{ensure_subject_teacher, load_assignment};
use crate::services::{current_user, error_response};
use crate::utils::grading::{build_score_write, validate_components};

/// 校验请求中的成绩行，任一越界则整体拒绝；返回可写入的行与忽略的空行数
pub(crate) fn prepare_entries(
    roster: &HashMap<i64, &Student>,
    entries: &[ScoreEntry],
) -> Result<(Vec<ScoreWrite>, usize)> {
    let mut writes = Vec::new();
    let mut ignored = 0;

    for entry in entries {
        let student = roster.get(&entry.student_id).ok_or_else(|| {
            SchoolHubError::validation(format!(
                "Student {} is not an active member of this class",
                entry.student_id
            ))
        })?;

        validate_components(&student.full_name(), entry.ca1, entry.ca2, entry.exam)?;

        if entry.has_any_value() {
            writes.push(build_score_write(
                entry.student_id,
                entry.ca1,
                entry.ca2,
                entry.exam,
            ));
        } else {
            ignored += 1;
        }
    }

    Ok((writes, ignored))
}

/// 保存草稿：全部校验通过后在一个事务内写入
pub async fn save_draft(
    context: &SchoolContext,
    user: &User,
    draft: SaveDraftRequest,
) -> Result<DraftSaveResponse> {
    let assignment = load_assignment(context, draft.assignment_id).await?;
    ensure_subject_teacher(user, &assignment)?;

    let roster = context.class_roster(assignment.class_id).await?;
    let by_id: HashMap<i64, &Student> = roster.iter().map(|s| (s.id, s)).collect();
    let (writes, ignored) = prepare_entries(&by_id, &draft.scores)?;

    let saved = context
        .storage()
        .save_draft_scores(assignment.id, user.id, writes)
        .await?;

    info!(
        "Draft scores saved for assignment {} by user {}: {} saved, {} ignored",
        assignment.id, user.id, saved, ignored
    );

    Ok(DraftSaveResponse { saved, ignored })
}

pub async fn handle_save_draft(
    service: &ScoreService,
    request: &HttpRequest,
    draft: SaveDraftRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match save_draft(&context, &user, draft).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Draft saved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to save draft scores")),
    }
}
