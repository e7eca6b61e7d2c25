use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级（附带学生数、科目数）
    async fn list_classes_with_pagination(
        &self,
        query: ClassQueryParams,
    ) -> Result<ClassListResponse>;

    /// 学生方法
    async fn create_student(&self, class_id: i64, student: CreateStudentRequest)
    -> Result<Student>;
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>>;
    // 班级在读学生，按姓名排序
    async fn list_active_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;

    /// 科目分配方法
    async fn create_subject_assignment(
        &self,
        assignment: CreateSubjectAssignmentRequest,
    ) -> Result<SubjectAssignment>;
    async fn get_subject_assignment_by_id(
        &self,
        assignment_id: i64,
    ) -> Result<Option<SubjectAssignment>>;
    async fn list_class_subject_assignments(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<SubjectAssignment>>;

    /// 成绩方法
    async fn list_scores_by_assignment(&self, assignment_id: i64) -> Result<Vec<Score>>;
    // 在一个事务内保存草稿；任一目标行已提交则整体失败
    async fn save_draft_scores(
        &self,
        assignment_id: i64,
        entered_by: i64,
        rows: Vec<ScoreWrite>,
    ) -> Result<usize>;
    // 在一个事务内提交整张成绩表并写入班级统计
    async fn submit_scores(
        &self,
        assignment_id: i64,
        entered_by: i64,
        rows: Vec<ScoreWrite>,
        stats: SubjectStats,
    ) -> Result<usize>;
    // 退回草稿并清空班级统计
    async fn unlock_scores(&self, assignment_ids: &[i64]) -> Result<u64>;
    // 班级某学期全部已提交成绩
    async fn list_submitted_scores_for_class(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<Score>>;

    /// 评分方法
    async fn upsert_affective_domain(
        &self,
        rating: AffectiveRatingRequest,
        rated_by: i64,
    ) -> Result<AffectiveDomain>;
    async fn upsert_psychomotor_domain(
        &self,
        rating: PsychomotorRatingRequest,
        rated_by: i64,
    ) -> Result<PsychomotorDomain>;
    async fn list_affective_domains(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<AffectiveDomain>>;
    async fn list_psychomotor_domains(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<PsychomotorDomain>>;

    /// 成绩单方法
    async fn get_result_batch_state(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Option<BatchState>>;
    // 在一个事务内写入整批成绩单，状态置为已提交
    async fn save_compiled_results(
        &self,
        class_id: i64,
        session: &AcademicSession,
        compiled_by: i64,
        rows: Vec<CompiledResultWrite>,
    ) -> Result<usize>;
    async fn approve_result_batch(
        &self,
        class_id: i64,
        session: &AcademicSession,
        approved_by: i64,
    ) -> Result<u64>;
    // 驳回整批成绩单，可选同时退回该学期成绩表；返回 (驳回行数, 解锁成绩行数)
    async fn reject_result_batch(
        &self,
        class_id: i64,
        session: &AcademicSession,
        reason: &str,
        unlock_scores: bool,
    ) -> Result<(u64, u64)>;
    async fn list_compiled_results(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<CompiledResult>>;
    async fn list_student_results(
        &self,
        student_id: i64,
        status: Option<ResultStatus>,
    ) -> Result<Vec<CompiledResult>>;

    /// 通知方法
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications_for_role(
        &self,
        role: UserRole,
        query: PaginationQuery,
    ) -> Result<NotificationListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
