//! 成绩单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "compiled_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term: String,
    pub academic_year: String,
    /// 各科成绩快照（JSON）
    #[sea_orm(column_type = "Text")]
    pub subject_scores: String,
    pub affective_id: i64,
    pub psychomotor_id: i64,
    pub total_score: f64,
    pub average_score: f64,
    pub class_average: f64,
    pub position: Option<i64>,
    pub total_students: i64,
    pub subjects_count: i64,
    #[sea_orm(column_type = "Text")]
    pub teacher_comment: String,
    pub status: String,
    pub compiled_by: i64,
    pub compiled_at: i64,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_compiled_result(
        self,
    ) -> Result<crate::models::results::entities::CompiledResult, serde_json::Error> {
        use crate::models::common::Term;
        use crate::models::results::entities::{CompiledResult, ResultStatus};

        Ok(CompiledResult {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            term: self.term.parse::<Term>().unwrap_or(Term::First),
            academic_year: self.academic_year,
            subject_scores: serde_json::from_str(&self.subject_scores)?,
            affective_id: self.affective_id,
            psychomotor_id: self.psychomotor_id,
            total_score: self.total_score,
            average_score: self.average_score,
            class_average: self.class_average,
            position: self.position,
            total_students: self.total_students,
            subjects_count: self.subjects_count,
            teacher_comment: self.teacher_comment,
            status: self
                .status
                .parse::<ResultStatus>()
                .unwrap_or(ResultStatus::Draft),
            compiled_by: self.compiled_by,
            compiled_at: super::from_timestamp(self.compiled_at),
            approved_by: self.approved_by,
            approved_at: self.approved_at.map(super::from_timestamp),
            rejection_reason: self.rejection_reason,
            updated_at: super::from_timestamp(self.updated_at),
        })
    }
}
