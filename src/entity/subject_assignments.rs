//! 科目分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subject_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_name: String,
    pub term: String,
    pub academic_year: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject_assignment(self) -> crate::models::subjects::entities::SubjectAssignment {
        use crate::models::common::Term;

        crate::models::subjects::entities::SubjectAssignment {
            id: self.id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            subject_name: self.subject_name,
            term: self.term.parse::<Term>().unwrap_or(Term::First),
            academic_year: self.academic_year,
            created_at: super::from_timestamp(self.created_at),
        }
    }
}
