//! 情感领域评分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "affective_domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term: String,
    pub academic_year: String,
    pub punctuality: i16,
    pub neatness: i16,
    pub politeness: i16,
    pub honesty: i16,
    pub relationship_with_others: i16,
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
    pub fn into_affective(self) -> crate::models::domains::entities::AffectiveDomain {
        use crate::models::common::Term;

        crate::models::domains::entities::AffectiveDomain {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            term: self.term.parse::<Term>().unwrap_or(Term::First),
            academic_year: self.academic_year,
            punctuality: self.punctuality,
            neatness: self.neatness,
            politeness: self.politeness,
            honesty: self.honesty,
            relationship_with_others: self.relationship_with_others,
            remarks: self.remarks,
            rated_by: self.rated_by,
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
