//! 资源归属校验
//!
//! 路由层的 `RequirePermission` 只检查角色权限，这里检查用户与具体班级、科目的关系。

use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::classes::entities::Class;
use crate::models::common::{AcademicSession, Term};
use crate::models::subjects::entities::SubjectAssignment;
use crate::models::users::entities::User;

pub(crate) async fn load_class(context: &SchoolContext, class_id: i64) -> Result<Class> {
    context
        .class(class_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found(format!("Class {class_id} not found")))
}

pub(crate) async fn load_assignment(
    context: &SchoolContext,
    assignment_id: i64,
) -> Result<SubjectAssignment> {
    context
        .storage()
        .get_subject_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| {
            SchoolHubError::not_found(format!("Subject assignment {assignment_id} not found"))
        })
}

/// 科目教师或管理员
pub(crate) fn ensure_subject_teacher(user: &User, assignment: &SubjectAssignment) -> Result<()> {
    if user.is_admin() || assignment.teacher_id == user.id {
        Ok(())
    } else {
        Err(SchoolHubError::authorization(
            "Only the subject teacher can manage scores for this subject",
        ))
    }
}

/// 班主任或管理员
pub(crate) fn ensure_class_teacher(user: &User, class: &Class) -> Result<()> {
    if user.is_admin() || class.is_class_teacher(user.id) {
        Ok(())
    } else {
        Err(SchoolHubError::authorization(
            "Only the class teacher can perform this action",
        ))
    }
}

/// 成绩表可由科目教师、班主任或管理员查看
pub(crate) async fn ensure_sheet_viewer(
    context: &SchoolContext,
    user: &User,
    assignment: &SubjectAssignment,
) -> Result<()> {
    if ensure_subject_teacher(user, assignment).is_ok() {
        return Ok(());
    }
    let class = load_class(context, assignment.class_id).await?;
    ensure_class_teacher(user, &class)
}

pub(crate) fn ensure_admin(user: &User) -> Result<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(SchoolHubError::authorization(
            "Only administrators can perform this action",
        ))
    }
}

/// 校验学年格式并组装学期
pub(crate) fn checked_session(term: Term, academic_year: &str) -> Result<AcademicSession> {
    AcademicSession::new(term, academic_year).map_err(SchoolHubError::validation)
}
