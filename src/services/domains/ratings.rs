//! 情感领域、心理运动领域评分
//!
//! 只有班主任（或管理员）可以录入；批次已提交或已审核时拒绝修改。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DomainService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::classes::entities::Class;
use crate::models::common::{AcademicSession, ClassSessionQuery, Term};
use crate::models::domains::entities::{
    AffectiveDomain, ClassDomainsResponse, MAX_RATING, MIN_RATING, PsychomotorDomain,
};
use crate::models::domains::requests::{AffectiveRatingRequest, PsychomotorRatingRequest};
use crate::models::users::entities::User;
use crate::services::access::{checked_session, ensure_class_teacher, load_class};
use crate::services::{current_user, error_response};

/// 校验每项评分在 1–5 之间
pub fn validate_ratings(ratings: &[(&'static str, i16)]) -> Result<()> {
    for (field, value) in ratings {
        if !(MIN_RATING..=MAX_RATING).contains(value) {
            return Err(SchoolHubError::validation(format!(
                "{field} must be between {MIN_RATING} and {MAX_RATING}, got {value}"
            )));
        }
    }
    Ok(())
}

/// 公共前置检查：学年格式、班主任身份、学生属于该班、批次未锁定
async fn prepare_rating(
    context: &SchoolContext,
    user: &User,
    class_id: i64,
    student_id: i64,
    term: Term,
    academic_year: &str,
) -> Result<(Class, AcademicSession)> {
    let session = checked_session(term, academic_year)?;
    let class = load_class(context, class_id).await?;
    ensure_class_teacher(user, &class)?;

    let roster = context.class_roster(class.id).await?;
    if !roster.iter().any(|s| s.id == student_id) {
        return Err(SchoolHubError::validation(format!(
            "Student {student_id} is not an active member of {}",
            class.name
        )));
    }

    if let Some(state) = context
        .storage()
        .get_result_batch_state(class.id, &session)
        .await?
        && state.status.is_locked()
    {
        return Err(SchoolHubError::results_already_submitted(format!(
            "Results for {} are {}; ratings can no longer be changed",
            class.name, state.status
        )));
    }

    Ok((class, session))
}

pub async fn rate_affective(
    context: &SchoolContext,
    user: &User,
    rating: AffectiveRatingRequest,
) -> Result<AffectiveDomain> {
    validate_ratings(&rating.ratings())?;
    let (class, _) = prepare_rating(
        context,
        user,
        rating.class_id,
        rating.student_id,
        rating.term,
        &rating.academic_year,
    )
    .await?;

    let saved = context
        .storage()
        .upsert_affective_domain(rating, user.id)
        .await?;
    info!(
        "Affective ratings saved for student {} in class {} by user {}",
        saved.student_id, class.id, user.id
    );
    Ok(saved)
}

pub async fn rate_psychomotor(
    context: &SchoolContext,
    user: &User,
    rating: PsychomotorRatingRequest,
) -> Result<PsychomotorDomain> {
    validate_ratings(&rating.ratings())?;
    let (class, _) = prepare_rating(
        context,
        user,
        rating.class_id,
        rating.student_id,
        rating.term,
        &rating.academic_year,
    )
    .await?;

    let saved = context
        .storage()
        .upsert_psychomotor_domain(rating, user.id)
        .await?;
    info!(
        "Psychomotor ratings saved for student {} in class {} by user {}",
        saved.student_id, class.id, user.id
    );
    Ok(saved)
}

pub async fn list_domains(
    context: &SchoolContext,
    user: &User,
    query: ClassSessionQuery,
) -> Result<ClassDomainsResponse> {
    let session = checked_session(query.term, &query.academic_year)?;
    let class = load_class(context, query.class_id).await?;
    ensure_class_teacher(user, &class)?;

    let affective = context
        .storage()
        .list_affective_domains(class.id, &session)
        .await?;
    let psychomotor = context
        .storage()
        .list_psychomotor_domains(class.id, &session)
        .await?;

    Ok(ClassDomainsResponse {
        affective,
        psychomotor,
    })
}

pub async fn handle_rate_affective(
    service: &DomainService,
    request: &HttpRequest,
    rating: AffectiveRatingRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match rate_affective(&context, &user, rating).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            saved,
            "Affective ratings saved",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to save affective ratings")),
    }
}

pub async fn handle_rate_psychomotor(
    service: &DomainService,
    request: &HttpRequest,
    rating: PsychomotorRatingRequest,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match rate_psychomotor(&context, &user, rating).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            saved,
            "Psychomotor ratings saved",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to save psychomotor ratings")),
    }
}

pub async fn handle_list(
    service: &DomainService,
    request: &HttpRequest,
    query: ClassSessionQuery,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match list_domains(&context, &user, query).await {
        Ok(domains) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            domains,
            "Ratings retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list ratings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_ratings(&[("games", 1), ("sports", 5)]).is_ok());
        let err = validate_ratings(&[("games", 3), ("sports", 6)]).unwrap_err();
        assert!(err.message().contains("sports"));
        assert!(validate_ratings(&[("neatness", 0)]).is_err());
    }
}
