use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScoreService;
use super::draft::prepare_entries;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::scores::requests::SubmitScoresRequest;
use crate::models::scores::responses::{
    MissingScore, ScoreCompletenessReport, ScoreSubmitResponse,
};
use crate::models::students::entities::Student;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_subject_teacher, load_assignment};
use crate::services::{current_user, error_response};
use crate::utils::grading::{build_score_write, missing_components};
use crate::utils::ranking::{competition_ranks, subject_stats};

/// 提交结果：成功，或返回缺失成绩清单（未写入任何数据）
#[derive(Debug)]
pub enum ScoreSubmitOutcome {
    Submitted(ScoreSubmitResponse),
    Incomplete(ScoreCompletenessReport),
}

/// 提交整张成绩表
///
/// 已保存的草稿与请求中附带的改动合并，每个在读学生三项分数齐全才允许提交。
/// 班级平均分、最低分、最高分与单科名次写入每一行，整表在一个事务内置为已提交。
pub async fn submit_scores(
    context: &SchoolContext,
    user: &User,
    submit: SubmitScoresRequest,
) -> Result<ScoreSubmitOutcome> {
    let assignment = load_assignment(context, submit.assignment_id).await?;
    ensure_subject_teacher(user, &assignment)?;

    let existing = context
        .storage()
        .list_scores_by_assignment(assignment.id)
        .await?;
    if existing.iter().any(|s| s.is_locked()) {
        return Err(SchoolHubError::scores_already_submitted(format!(
            "Scores for {} have already been submitted",
            assignment.subject_name
        )));
    }

    let roster = context.class_roster(assignment.class_id).await?;
    if roster.is_empty() {
        return Err(SchoolHubError::validation(
            "This class has no active students to submit scores for",
        ));
    }
    let by_id: HashMap<i64, &Student> = roster.iter().map(|s| (s.id, s)).collect();
    let (incoming, _) = prepare_entries(&by_id, &submit.scores)?;

    let mut components: HashMap<i64, (Option<f64>, Option<f64>, Option<f64>)> = existing
        .iter()
        .map(|s| (s.student_id, (s.ca1, s.ca2, s.exam)))
        .collect();
    for row in &incoming {
        let entry = components.entry(row.student_id).or_default();
        *entry = (
            row.ca1.or(entry.0),
            row.ca2.or(entry.1),
            row.exam.or(entry.2),
        );
    }

    let mut missing = Vec::new();
    let mut complete = Vec::with_capacity(roster.len());
    for student in &roster {
        let (ca1, ca2, exam) = components.get(&student.id).copied().unwrap_or_default();
        let missing_fields = missing_components(ca1, ca2, exam);
        if missing_fields.is_empty() {
            complete.push(build_score_write(student.id, ca1, ca2, exam));
        } else {
            missing.push(MissingScore {
                student_id: student.id,
                student_name: student.full_name(),
                missing_fields,
            });
        }
    }

    if !missing.is_empty() {
        info!(
            "Score submission for assignment {} blocked: {} student(s) incomplete",
            assignment.id,
            missing.len()
        );
        return Ok(ScoreSubmitOutcome::Incomplete(ScoreCompletenessReport {
            assignment_id: assignment.id,
            missing,
        }));
    }

    let totals: Vec<f64> = complete.iter().map(|r| r.total).collect();
    let stats = subject_stats(&totals).ok_or_else(|| {
        SchoolHubError::validation("No scores available to compute class statistics")
    })?;
    for (row, position) in complete.iter_mut().zip(competition_ranks(&totals)) {
        row.subject_position = Some(position);
    }

    let submitted = context
        .storage()
        .submit_scores(assignment.id, user.id, complete, stats)
        .await?;

    info!(
        "Scores submitted for assignment {} by user {}: {} rows, class average {}",
        assignment.id, user.id, submitted, stats.class_average
    );

    Ok(ScoreSubmitOutcome::Submitted(ScoreSubmitResponse {
        assignment_id: assignment.id,
        submitted,
        class_average: stats.class_average,
        class_min: stats.class_min,
        class_max: stats.class_max,
    }))
}

pub async fn handle_submit(
    service: &ScoreService,
    request: &HttpRequest,
    submit: SubmitScoresRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match submit_scores(&context, &user, submit).await {
        Ok(ScoreSubmitOutcome::Submitted(result)) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(result, "Scores submitted successfully"),
        )),
        Ok(ScoreSubmitOutcome::Incomplete(report)) => {
            let message = format!(
                "{} student(s) are missing scores",
                report.missing.len()
            );
            Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error(
                ErrorCode::ScoresIncomplete,
                report,
                message,
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to submit scores")),
    }
}
