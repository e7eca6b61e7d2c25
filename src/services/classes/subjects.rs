use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use super::create::ensure_teacher_account;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::subjects::entities::SubjectAssignment;
use crate::models::subjects::requests::{ClassSubjectsQuery, CreateSubjectAssignmentRequest};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{checked_session, ensure_admin, load_class};
use crate::services::{current_user, error_response};
use crate::utils::validate::validate_display_name;

/// 班级某学期的登记科目
pub async fn list_subjects(
    context: &SchoolContext,
    class_id: i64,
    query: ClassSubjectsQuery,
) -> Result<Vec<SubjectAssignment>> {
    let session = checked_session(query.term, &query.academic_year)?;
    load_class(context, class_id).await?;
    context.class_subjects(class_id, &session).await
}

/// 为科目教师分配班级科目（管理员）
pub async fn create_subject_assignment(
    context: &SchoolContext,
    user: &User,
    mut assignment: CreateSubjectAssignmentRequest,
) -> Result<SubjectAssignment> {
    ensure_admin(user)?;
    let session = checked_session(assignment.term, &assignment.academic_year)?;
    validate_display_name("Subject name", &assignment.subject_name, 64)
        .map_err(SchoolHubError::validation)?;
    assignment.subject_name = assignment.subject_name.trim().to_string();

    load_class(context, assignment.class_id).await?;
    ensure_teacher_account(context, assignment.teacher_id).await?;

    let created = context
        .storage()
        .create_subject_assignment(assignment)
        .await?;
    context
        .invalidate_class_subjects(created.class_id, &session)
        .await;

    info!(
        "Subject {} assigned to teacher {} for class {} ({} term, {})",
        created.subject_name,
        created.teacher_id,
        created.class_id,
        session.term,
        session.academic_year
    );
    Ok(created)
}

pub async fn handle_list_subjects(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    query: ClassSubjectsQuery,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;

    match list_subjects(&context, class_id, query).await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subjects,
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list subjects")),
    }
}

pub async fn handle_create_assignment(
    service: &ClassService,
    request: &HttpRequest,
    assignment: CreateSubjectAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match create_subject_assignment(&context, &user, assignment).await {
        Ok(created) => Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Subject assigned successfully",
        ))),
        Err(SchoolHubError::AlreadyExists(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubjectAssignmentAlreadyExists,
                "This subject is already assigned for the class and term",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to assign subject")),
    }
}
