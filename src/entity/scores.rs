//! 成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub ca1: Option<f64>,
    pub ca2: Option<f64>,
    pub exam: Option<f64>,
    pub total: f64,
    pub grade: String,
    pub remark: String,
    pub status: String,
    pub class_average: Option<f64>,
    pub class_min: Option<f64>,
    pub class_max: Option<f64>,
    pub subject_position: Option<i64>,
    pub entered_by: i64,
    pub submitted_at: Option<i64>,
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
        belongs_to = "super::subject_assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::subject_assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subject_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_score(self) -> crate::models::scores::entities::Score {
        use crate::models::scores::entities::{Grade, Score, ScoreStatus};

        Score {
            id: self.id,
            student_id: self.student_id,
            assignment_id: self.assignment_id,
            ca1: self.ca1,
            ca2: self.ca2,
            exam: self.exam,
            total: self.total,
            grade: self.grade.parse::<Grade>().unwrap_or(Grade::F),
            remark: self.remark,
            // 无法识别的状态按已提交处理，避免误解锁
            status: self
                .status
                .parse::<ScoreStatus>()
                .unwrap_or(ScoreStatus::Submitted),
            class_average: self.class_average,
            class_min: self.class_min,
            class_max: self.class_max,
            subject_position: self.subject_position,
            entered_by: self.entered_by,
            submitted_at: self.submitted_at.map(super::from_timestamp),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
