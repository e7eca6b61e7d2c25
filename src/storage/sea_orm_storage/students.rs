//! 学生存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SchoolHubError};
use crate::models::students::{
    entities::{Student, StudentStatus},
    requests::CreateStudentRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 新增学生
    pub async fn create_student_impl(
        &self,
        class_id: i64,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            admission_number: Set(req.admission_number),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("新增学生失败", e, Some(SchoolHubError::AlreadyExists)))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 班级在读学生
    pub async fn list_active_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(StudentStatus::Active.to_string()))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}
