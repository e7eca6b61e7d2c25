//! 心理运动领域评分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "psychomotor_domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term: String,
    pub academic_year: String,
    pub handwriting: i16,
    pub verbal_fluency: i16,
    pub games: i16,
    pub sports: i16,
    pub handling_tools: i16,
    pub drawing_painting: i16,
    pub remarks: Option<String>,
    pub rated_by: i64,
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
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_psychomotor(self) -> crate::models::domains::entities::PsychomotorDomain {
        use crate::models::common::Term;

        crate::models::domains::entities::PsychomotorDomain {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            term: self.term.parse::<Term>().unwrap_or(Term::First),
            academic_year: self.academic_year,
            handwriting: self.handwriting,
            verbal_fluency: self.verbal_fluency,
            games: self.games,
            sports: self.sports,
            handling_tools: self.handling_tools,
            drawing_painting: self.drawing_painting,
            remarks: self.remarks,
            rated_by: self.rated_by,
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
