//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod classes;
mod domains;
mod notifications;
mod results;
mod scores;
mod students;
mod subjects;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM storage initialized, database: {}", db_url);
        Ok(storage)
    }

    /// 基于已有连接创建存储实例并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 内存 SQLite（单连接，测试用）
    pub async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;
        Self::from_connection(db).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 数据库错误统一转换；唯一约束冲突交给调用方指定的业务错误
pub(crate) fn db_error(
    context: &str,
    err: DbErr,
    on_conflict: Option<fn(String) -> SchoolHubError>,
) -> SchoolHubError {
    match on_conflict {
        Some(conflict) if is_unique_violation(&err) => conflict(format!("{context}: {err}")),
        _ => SchoolHubError::database_operation(format!("{context}: {err}")),
    }
}

// Storage trait 实现
use crate::models::{
    PaginationQuery,
    classes::{
        entities::Class,
        requests::{ClassQueryParams, CreateClassRequest},
        responses::ClassListResponse,
    },
    common::AcademicSession,
    domains::{
        entities::{AffectiveDomain, PsychomotorDomain},
        requests::{AffectiveRatingRequest, PsychomotorRatingRequest},
    },
    notifications::{
        entities::Notification, requests::NewNotification, responses::NotificationListResponse,
    },
    results::entities::{BatchState, CompiledResult, CompiledResultWrite, ResultStatus},
    scores::entities::{Score, ScoreWrite, SubjectStats},
    students::{entities::Student, requests::CreateStudentRequest},
    subjects::{entities::SubjectAssignment, requests::CreateSubjectAssignmentRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassQueryParams,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    // 学生模块
    async fn create_student(
        &self,
        class_id: i64,
        student: CreateStudentRequest,
    ) -> Result<Student> {
        self.create_student_impl(class_id, student).await
    }

    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(student_id).await
    }

    async fn list_active_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_active_students_by_class_impl(class_id).await
    }

    // 科目分配模块
    async fn create_subject_assignment(
        &self,
        assignment: CreateSubjectAssignmentRequest,
    ) -> Result<SubjectAssignment> {
        self.create_subject_assignment_impl(assignment).await
    }

    async fn get_subject_assignment_by_id(
        &self,
        assignment_id: i64,
    ) -> Result<Option<SubjectAssignment>> {
        self.get_subject_assignment_by_id_impl(assignment_id).await
    }

    async fn list_class_subject_assignments(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<SubjectAssignment>> {
        self.list_class_subject_assignments_impl(class_id, session)
            .await
    }

    // 成绩模块
    async fn list_scores_by_assignment(&self, assignment_id: i64) -> Result<Vec<Score>> {
        self.list_scores_by_assignment_impl(assignment_id).await
    }

    async fn save_draft_scores(
        &self,
        assignment_id: i64,
        entered_by: i64,
        rows: Vec<ScoreWrite>,
    ) -> Result<usize> {
        self.save_draft_scores_impl(assignment_id, entered_by, rows)
            .await
    }

    async fn submit_scores(
        &self,
        assignment_id: i64,
        entered_by: i64,
        rows: Vec<ScoreWrite>,
        stats: SubjectStats,
    ) -> Result<usize> {
        self.submit_scores_impl(assignment_id, entered_by, rows, stats)
            .await
    }

    async fn unlock_scores(&self, assignment_ids: &[i64]) -> Result<u64> {
        self.unlock_scores_impl(assignment_ids).await
    }

    async fn list_submitted_scores_for_class(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<Score>> {
        self.list_submitted_scores_for_class_impl(class_id, session)
            .await
    }

    // 评分模块
    async fn upsert_affective_domain(
        &self,
        rating: AffectiveRatingRequest,
        rated_by: i64,
    ) -> Result<AffectiveDomain> {
        self.upsert_affective_domain_impl(rating, rated_by).await
    }

    async fn upsert_psychomotor_domain(
        &self,
        rating: PsychomotorRatingRequest,
        rated_by: i64,
    ) -> Result<PsychomotorDomain> {
        self.upsert_psychomotor_domain_impl(rating, rated_by).await
    }

    async fn list_affective_domains(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<AffectiveDomain>> {
        self.list_affective_domains_impl(class_id, session).await
    }

    async fn list_psychomotor_domains(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<PsychomotorDomain>> {
        self.list_psychomotor_domains_impl(class_id, session).await
    }

    // 成绩单模块
    async fn get_result_batch_state(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Option<BatchState>> {
        self.get_result_batch_state_impl(class_id, session).await
    }

    async fn save_compiled_results(
        &self,
        class_id: i64,
        session: &AcademicSession,
        compiled_by: i64,
        rows: Vec<CompiledResultWrite>,
    ) -> Result<usize> {
        self.save_compiled_results_impl(class_id, session, compiled_by, rows)
            .await
    }

    async fn approve_result_batch(
        &self,
        class_id: i64,
        session: &AcademicSession,
        approved_by: i64,
    ) -> Result<u64> {
        self.approve_result_batch_impl(class_id, session, approved_by)
            .await
    }

    async fn reject_result_batch(
        &self,
        class_id: i64,
        session: &AcademicSession,
        reason: &str,
        unlock_scores: bool,
    ) -> Result<(u64, u64)> {
        self.reject_result_batch_impl(class_id, session, reason, unlock_scores)
            .await
    }

    async fn list_compiled_results(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<CompiledResult>> {
        self.list_compiled_results_impl(class_id, session).await
    }

    async fn list_student_results(
        &self,
        student_id: i64,
        status: Option<ResultStatus>,
    ) -> Result<Vec<CompiledResult>> {
        self.list_student_results_impl(student_id, status).await
    }

    // 通知模块
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications_for_role(
        &self,
        role: UserRole,
        query: PaginationQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_for_role_impl(role, query).await
    }
}
