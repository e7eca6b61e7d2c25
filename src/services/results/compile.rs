//! 成绩单汇总
//!
//! 输入：班级某学期全部已提交成绩、两类评分、班主任评语。
//! 任一在读学生不完整则整批阻断，不写入任何数据。

use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ResultService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::classes::entities::Class;
use crate::models::common::{AcademicSession, ClassSessionQuery};
use crate::models::notifications::entities::NotificationType;
use crate::models::notifications::requests::NewNotification;
use crate::models::results::entities::{CompiledResultWrite, ResultStatus};
use crate::models::results::requests::CompileResultsRequest;
use crate::models::results::responses::{
    CompileResultsResponse, CompletenessReport, ResultPreviewRow, ResultsPreviewResponse,
    StudentCompleteness,
};
use crate::models::scores::entities::{Score, SubjectScoreSnapshot};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{checked_session, ensure_class_teacher, load_class};
use crate::services::{current_user, error_response};
use crate::utils::grading::auto_comment;
use crate::utils::ranking::{rank_by_average, round2};

/// 汇总计算结果（尚未写入）
#[derive(Debug, Clone)]
pub(crate) struct CompiledBatch {
    pub rows: Vec<ResultPreviewRow>,
    pub class_average: f64,
    pub total_students: i64,
    pub completeness: CompletenessReport,
}

impl CompiledBatch {
    /// 转换为存储层写入行；只在完整性检查通过后调用
    fn into_writes(self) -> Vec<CompiledResultWrite> {
        let total_students = self.total_students;
        let class_average = self.class_average;
        self.rows
            .into_iter()
            .filter_map(|row| {
                Some(CompiledResultWrite {
                    student_id: row.student_id,
                    affective_id: row.affective_id?,
                    psychomotor_id: row.psychomotor_id?,
                    teacher_comment: row.comment?,
                    subject_scores: row.subjects,
                    total_score: row.total_score,
                    average_score: row.average_score,
                    class_average,
                    position: row.position,
                    total_students,
                    subjects_count: row.subjects_count,
                })
            })
            .collect()
    }
}

fn snapshot(score: &Score, subject_name: &str) -> SubjectScoreSnapshot {
    SubjectScoreSnapshot {
        assignment_id: score.assignment_id,
        subject_name: subject_name.to_string(),
        ca1: score.ca1.unwrap_or_default(),
        ca2: score.ca2.unwrap_or_default(),
        exam: score.exam.unwrap_or_default(),
        total: score.total,
        grade: score.grade,
        remark: score.remark.clone(),
        class_average: score.class_average,
        subject_position: score.subject_position,
    }
}

/// 计算整批成绩单
///
/// `comments` 为班主任显式填写的评语；`use_auto_comment` 为真时未填写的学生使用按平均分生成的评语。
pub(crate) async fn build_batch(
    context: &SchoolContext,
    class_id: i64,
    session: &AcademicSession,
    comments: &HashMap<i64, String>,
    use_auto_comment: bool,
) -> Result<CompiledBatch> {
    let storage = context.storage();
    let roster = context.refresh_class_roster(class_id).await?;
    let subjects = context.class_subjects(class_id, session).await?;
    let subject_names: BTreeMap<i64, &str> = subjects
        .iter()
        .map(|a| (a.id, a.subject_name.as_str()))
        .collect();

    let mut scores_by_student: HashMap<i64, Vec<Score>> = HashMap::new();
    for score in storage
        .list_submitted_scores_for_class(class_id, session)
        .await?
    {
        scores_by_student
            .entry(score.student_id)
            .or_default()
            .push(score);
    }

    let affective: HashMap<i64, i64> = storage
        .list_affective_domains(class_id, session)
        .await?
        .into_iter()
        .map(|d| (d.student_id, d.id))
        .collect();
    let psychomotor: HashMap<i64, i64> = storage
        .list_psychomotor_domains(class_id, session)
        .await?
        .into_iter()
        .map(|d| (d.student_id, d.id))
        .collect();

    let registered = subject_names.len();
    let mut rows = Vec::with_capacity(roster.len());
    let mut incomplete = Vec::new();

    for student in &roster {
        let scores = scores_by_student.remove(&student.id).unwrap_or_default();
        let mut subjects: Vec<SubjectScoreSnapshot> = scores
            .iter()
            .filter_map(|s| subject_names.get(&s.assignment_id).map(|n| snapshot(s, n)))
            .collect();
        subjects.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));

        let total_score = round2(subjects.iter().map(|s| s.total).sum::<f64>());
        let average_score = if subjects.is_empty() {
            0.0
        } else {
            round2(total_score / subjects.len() as f64)
        };
        let suggested = auto_comment(average_score).to_string();
        let comment = comments
            .get(&student.id)
            .cloned()
            .or_else(|| use_auto_comment.then(|| suggested.clone()));

        let mut missing: Vec<String> = subject_names
            .iter()
            .filter(|(id, _)| !subjects.iter().any(|s| s.assignment_id == **id))
            .map(|(_, name)| format!("{name} score"))
            .collect();
        let affective_id = affective.get(&student.id).copied();
        let psychomotor_id = psychomotor.get(&student.id).copied();
        if affective_id.is_none() {
            missing.push("affective rating".to_string());
        }
        if psychomotor_id.is_none() {
            missing.push("psychomotor rating".to_string());
        }
        if comment.is_none() {
            missing.push("teacher comment".to_string());
        }

        if subjects.len() != registered || !missing.is_empty() {
            incomplete.push(StudentCompleteness {
                student_id: student.id,
                student_name: student.full_name(),
                missing,
            });
        }

        rows.push(ResultPreviewRow {
            student_id: student.id,
            student_name: student.full_name(),
            admission_number: student.admission_number.clone(),
            subjects_count: subjects.len() as i64,
            subjects,
            total_score,
            average_score,
            position: None,
            affective_id,
            psychomotor_id,
            comment,
            suggested_comment: suggested,
        });
    }

    let averages: Vec<f64> = rows.iter().map(|r| r.average_score).collect();
    let ranking = rank_by_average(&averages);
    for (row, position) in rows.iter_mut().zip(ranking.positions) {
        row.position = position;
    }

    Ok(CompiledBatch {
        rows,
        class_average: ranking.class_average,
        total_students: roster.len() as i64,
        completeness: CompletenessReport {
            registered_subjects: registered as i64,
            incomplete,
        },
    })
}

/// 预览：按自动评语补全后计算，不写入
pub async fn preview_results(
    context: &SchoolContext,
    user: &User,
    query: ClassSessionQuery,
) -> Result<ResultsPreviewResponse> {
    let session = checked_session(query.term, &query.academic_year)?;
    let class = load_class(context, query.class_id).await?;
    ensure_class_teacher(user, &class)?;

    let state = context
        .storage()
        .get_result_batch_state(class.id, &session)
        .await?;
    let batch = build_batch(context, class.id, &session, &HashMap::new(), true).await?;

    Ok(ResultsPreviewResponse {
        class_id: class.id,
        term: session.term,
        academic_year: session.academic_year,
        batch_status: state.as_ref().map(|s| s.status),
        rejection_reason: state.and_then(|s| s.rejection_reason),
        total_students: batch.total_students,
        class_average: batch.class_average,
        rows: batch.rows,
        completeness: batch.completeness,
    })
}

/// 汇总结果：成功，或返回完整性报告（未写入任何数据）
#[derive(Debug)]
pub enum CompileOutcome {
    Compiled(CompileResultsResponse),
    Incomplete(CompletenessReport),
}

fn submission_notice(
    class: &Class,
    session: &AcademicSession,
    user: &User,
    count: usize,
) -> NewNotification {
    NewNotification {
        title: format!("Results submitted: {}", class.name),
        message: format!(
            "{} results for the {} term of {} ({} students) were submitted for approval by {}.",
            class.name,
            session.term,
            session.academic_year,
            count,
            user.display_name.as_deref().unwrap_or(&user.username)
        ),
        notification_type: NotificationType::Info,
        target_audience: UserRole::ADMIN.to_string(),
        created_by: Some(user.id),
    }
}

/// 汇总并提交整批成绩单
///
/// 已提交或已审核的批次不可重复汇总；被驳回的批次原地更新后重新提交。
/// 写入成功后向管理员发送一条通知，通知失败只记录日志。
pub async fn compile_results(
    context: &SchoolContext,
    user: &User,
    request: CompileResultsRequest,
) -> Result<CompileOutcome> {
    let session = checked_session(request.term, &request.academic_year)?;
    let class = load_class(context, request.class_id).await?;
    ensure_class_teacher(user, &class)?;

    if let Some(state) = context
        .storage()
        .get_result_batch_state(class.id, &session)
        .await?
        && state.status.is_locked()
    {
        return Err(SchoolHubError::results_already_submitted(format!(
            "Results for {} ({} term, {}) are already {}",
            class.name, session.term, session.academic_year, state.status
        )));
    }

    let comments: HashMap<i64, String> = request
        .comments
        .iter()
        .filter(|c| !c.comment.trim().is_empty())
        .map(|c| (c.student_id, c.comment.trim().to_string()))
        .collect();

    let batch = build_batch(context, class.id, &session, &comments, request.auto_comment).await?;
    if batch.total_students == 0 {
        return Err(SchoolHubError::validation(
            "This class has no active students to compile results for",
        ));
    }
    if batch.completeness.registered_subjects == 0 {
        return Err(SchoolHubError::validation(
            "No subjects are registered for this class and term",
        ));
    }
    if !batch.completeness.is_complete() {
        info!(
            "Result compilation for class {} blocked: {} student(s) incomplete",
            class.id,
            batch.completeness.incomplete.len()
        );
        return Ok(CompileOutcome::Incomplete(batch.completeness));
    }

    let class_average = batch.class_average;
    let writes = batch.into_writes();
    let compiled = context
        .storage()
        .save_compiled_results(class.id, &session, user.id, writes)
        .await?;

    info!(
        "Results compiled for class {} ({} term, {}) by user {}: {} student(s), class average {}",
        class.id, session.term, session.academic_year, user.id, compiled, class_average
    );

    if let Err(e) = context
        .storage()
        .create_notification(submission_notice(&class, &session, user, compiled))
        .await
    {
        warn!(
            "Failed to notify administrators about class {} results: {}",
            class.id, e
        );
    }

    Ok(CompileOutcome::Compiled(CompileResultsResponse {
        class_id: class.id,
        term: session.term,
        academic_year: session.academic_year,
        compiled,
        class_average,
        status: ResultStatus::Submitted,
    }))
}

pub async fn handle_preview(
    service: &ResultService,
    request: &HttpRequest,
    query: ClassSessionQuery,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match preview_results(&context, &user, query).await {
        Ok(preview) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            preview,
            "Results preview generated",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to preview results")),
    }
}

pub async fn handle_compile(
    service: &ResultService,
    request: &HttpRequest,
    compile: CompileResultsRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match compile_results(&context, &user, compile).await {
        Ok(CompileOutcome::Compiled(result)) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(result, "Results submitted for approval"),
        )),
        Ok(CompileOutcome::Incomplete(report)) => {
            let message = format!(
                "{} student(s) have incomplete results",
                report.incomplete.len()
            );
            Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error(
                ErrorCode::ResultsIncomplete,
                report,
                message,
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to submit results")),
    }
}
