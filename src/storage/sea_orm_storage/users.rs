use super::{SeaOrmStorage, db_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            linked_id: Set(req.linked_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建用户失败", e, Some(SchoolHubError::AlreadyExists)))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计用户数量失败: {e}")))
    }
}
