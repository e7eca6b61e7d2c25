//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub class_teacher_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClassTeacherId",
        to = "super::users::Column::Id"
    )]
    ClassTeacher,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassTeacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        crate::models::classes::entities::Class {
            id: self.id,
            name: self.name,
            class_teacher_id: self.class_teacher_id,
            description: self.description,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
