//! 情感 / 心理运动领域评分存储操作

use super::SeaOrmStorage;
use crate::entity::{affective_domains, psychomotor_domains};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    common::AcademicSession,
    domains::{
        entities::{AffectiveDomain, PsychomotorDomain},
        requests::{AffectiveRatingRequest, PsychomotorRatingRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 新增或更新情感领域评分
    pub async fn upsert_affective_domain_impl(
        &self,
        req: AffectiveRatingRequest,
        rated_by: i64,
    ) -> Result<AffectiveDomain> {
        use affective_domains::{ActiveModel, Column, Entity};

        let existing = Entity::find()
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::ClassId.eq(req.class_id))
            .filter(Column::Term.eq(req.term.to_string()))
            .filter(Column::AcademicYear.eq(req.academic_year.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询情感评分失败: {e}")))?;

        let mut model = ActiveModel {
            punctuality: Set(req.punctuality),
            neatness: Set(req.neatness),
            politeness: Set(req.politeness),
            honesty: Set(req.honesty),
            relationship_with_others: Set(req.relationship_with_others),
            remarks: Set(req.remarks),
            rated_by: Set(rated_by),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let saved = match existing {
            Some(found) => {
                model.id = Set(found.id);
                model.update(&self.db).await
            }
            None => {
                model.student_id = Set(req.student_id);
                model.class_id = Set(req.class_id);
                model.term = Set(req.term.to_string());
                model.academic_year = Set(req.academic_year);
                model.insert(&self.db).await
            }
        }
        .map_err(|e| SchoolHubError::database_operation(format!("保存情感评分失败: {e}")))?;

        Ok(saved.into_affective())
    }

    /// 新增或更新心理运动领域评分
    pub async fn upsert_psychomotor_domain_impl(
        &self,
        req: PsychomotorRatingRequest,
        rated_by: i64,
    ) -> Result<PsychomotorDomain> {
        use psychomotor_domains::{ActiveModel, Column, Entity};

        let existing = Entity::find()
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::ClassId.eq(req.class_id))
            .filter(Column::Term.eq(req.term.to_string()))
            .filter(Column::AcademicYear.eq(req.academic_year.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("查询心理运动评分失败: {e}"))
            })?;

        let mut model = ActiveModel {
            handwriting: Set(req.handwriting),
            verbal_fluency: Set(req.verbal_fluency),
            games: Set(req.games),
            sports: Set(req.sports),
            handling_tools: Set(req.handling_tools),
            drawing_painting: Set(req.drawing_painting),
            remarks: Set(req.remarks),
            rated_by: Set(rated_by),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let saved = match existing {
            Some(found) => {
                model.id = Set(found.id);
                model.update(&self.db).await
            }
            None => {
                model.student_id = Set(req.student_id);
                model.class_id = Set(req.class_id);
                model.term = Set(req.term.to_string());
                model.academic_year = Set(req.academic_year);
                model.insert(&self.db).await
            }
        }
        .map_err(|e| SchoolHubError::database_operation(format!("保存心理运动评分失败: {e}")))?;

        Ok(saved.into_psychomotor())
    }

    /// 班级某学期的情感领域评分
    pub async fn list_affective_domains_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<AffectiveDomain>> {
        use affective_domains::{Column, Entity};

        let rows = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Term.eq(session.term.to_string()))
            .filter(Column::AcademicYear.eq(session.academic_year.as_str()))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询情感评分失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_affective()).collect())
    }

    /// 班级某学期的心理运动领域评分
    pub async fn list_psychomotor_domains_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<PsychomotorDomain>> {
        use psychomotor_domains::{Column, Entity};

        let rows = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Term.eq(session.term.to_string()))
            .filter(Column::AcademicYear.eq(session.academic_year.as_str()))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("查询心理运动评分失败: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_psychomotor()).collect())
    }
}
