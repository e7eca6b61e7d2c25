//! 班级存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::{students, subject_assignments};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassQueryParams, CreateClassRequest},
        responses::{ClassListResponse, ClassSummary},
    },
    students::entities::StudentStatus,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            class_teacher_id: Set(req.class_teacher_id),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建班级失败", e, Some(SchoolHubError::AlreadyExists)))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassQueryParams,
    ) -> Result<ClassListResponse> {
        let (page, size) = query.pagination.clamped();

        let mut select = Classes::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select.order_by_asc(Column::Name);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级列表失败: {e}")))?;

        let mut items = Vec::with_capacity(classes.len());
        for model in classes {
            let student_count = students::Entity::find()
                .filter(students::Column::ClassId.eq(model.id))
                .filter(students::Column::Status.eq(StudentStatus::Active.to_string()))
                .count(&self.db)
                .await
                .map_err(|e| {
                    SchoolHubError::database_operation(format!("统计班级学生失败: {e}"))
                })?;
            let subject_count = subject_assignments::Entity::find()
                .filter(subject_assignments::Column::ClassId.eq(model.id))
                .count(&self.db)
                .await
                .map_err(|e| {
                    SchoolHubError::database_operation(format!("统计班级科目失败: {e}"))
                })?;

            items.push(ClassSummary {
                class: model.into_class(),
                student_count: student_count as i64,
                subject_count: subject_count as i64,
            });
        }

        Ok(ClassListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}
