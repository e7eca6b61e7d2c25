use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScoreService;
use crate::context::SchoolContext;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::scores::entities::Score;
use crate::models::scores::responses::{ScoreSheetResponse, ScoreSheetRow, SheetStatus};
use crate::models::subjects::entities::SubjectAssignment;
use crate::models::users::entities::User;
use crate::services::access::{ensure_sheet_viewer, load_assignment};
use crate::services::{current_user, error_response};

/// 组装成绩表：每个在读学生一行，已有成绩填入，未录入留空
pub(crate) async fn build_sheet(
    context: &SchoolContext,
    assignment: SubjectAssignment,
) -> Result<ScoreSheetResponse> {
    let roster = context.class_roster(assignment.class_id).await?;
    let scores: HashMap<i64, Score> = context
        .storage()
        .list_scores_by_assignment(assignment.id)
        .await?
        .into_iter()
        .map(|s| (s.student_id, s))
        .collect();

    let status = if scores.values().any(|s| s.is_locked()) {
        SheetStatus::Submitted
    } else if scores.is_empty() {
        SheetStatus::Empty
    } else {
        SheetStatus::Draft
    };

    let stats = scores.values().find(|s| s.is_locked());
    let (class_average, class_min, class_max) = match stats {
        Some(s) => (s.class_average, s.class_min, s.class_max),
        None => (None, None, None),
    };

    let rows = roster
        .iter()
        .map(|student| {
            let score = scores.get(&student.id);
            ScoreSheetRow {
                student_id: student.id,
                student_name: student.full_name(),
                admission_number: student.admission_number.clone(),
                ca1: score.and_then(|s| s.ca1),
                ca2: score.and_then(|s| s.ca2),
                exam: score.and_then(|s| s.exam),
                total: score.map(|s| s.total),
                grade: score.map(|s| s.grade),
                remark: score.map(|s| s.remark.clone()),
                status: score.map(|s| s.status),
                subject_position: score.and_then(|s| s.subject_position),
            }
        })
        .collect();

    Ok(ScoreSheetResponse {
        assignment,
        status,
        class_average,
        class_min,
        class_max,
        rows,
    })
}

/// 读取成绩表（科目教师、班主任或管理员）
pub async fn load_score_sheet(
    context: &SchoolContext,
    user: &User,
    assignment_id: i64,
) -> Result<ScoreSheetResponse> {
    let assignment = load_assignment(context, assignment_id).await?;
    ensure_sheet_viewer(context, user, &assignment).await?;
    build_sheet(context, assignment).await
}

pub async fn handle_get_sheet(
    service: &ScoreService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match load_score_sheet(&context, &user, assignment_id).await {
        Ok(sheet) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            sheet,
            "Score sheet retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to load score sheet")),
    }
}
