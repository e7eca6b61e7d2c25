//! 科目分配存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::subject_assignments::{ActiveModel, Column, Entity as SubjectAssignments};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    common::AcademicSession,
    subjects::{entities::SubjectAssignment, requests::CreateSubjectAssignmentRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 新增科目分配
    pub async fn create_subject_assignment_impl(
        &self,
        req: CreateSubjectAssignmentRequest,
    ) -> Result<SubjectAssignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            class_id: Set(req.class_id),
            subject_name: Set(req.subject_name),
            term: Set(req.term.to_string()),
            academic_year: Set(req.academic_year),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("新增科目分配失败", e, Some(SchoolHubError::AlreadyExists)))?;

        Ok(result.into_subject_assignment())
    }

    /// 通过 ID 获取科目分配
    pub async fn get_subject_assignment_by_id_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<SubjectAssignment>> {
        let result = SubjectAssignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询科目分配失败: {e}")))?;

        Ok(result.map(|m| m.into_subject_assignment()))
    }

    /// 班级某学期的全部科目
    pub async fn list_class_subject_assignments_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<SubjectAssignment>> {
        let result = SubjectAssignments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Term.eq(session.term.to_string()))
            .filter(Column::AcademicYear.eq(session.academic_year.as_str()))
            .order_by_asc(Column::SubjectName)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级科目失败: {e}")))?;

        Ok(result
            .into_iter()
            .map(|m| m.into_subject_assignment())
            .collect())
    }
}
