//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub admission_number: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{Student, StudentStatus};

        Student {
            id: self.id,
            class_id: self.class_id,
            first_name: self.first_name,
            last_name: self.last_name,
            admission_number: self.admission_number,
            status: self
                .status
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Inactive),
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
