//! 集成测试公共夹具：内存 SQLite + Moka 缓存，绕过全局配置直接构建应用状态

#![allow(dead_code)]

use std::sync::Arc;

use rust_schoolhub::cache::ObjectCache;
use rust_schoolhub::cache::object_cache::moka::MokaCacheWrapper;
use rust_schoolhub::context::SchoolContext;
use rust_schoolhub::models::classes::entities::Class;
use rust_schoolhub::models::classes::requests::CreateClassRequest;
use rust_schoolhub::models::common::{AcademicSession, ClassSessionQuery, Term};
use rust_schoolhub::models::domains::requests::{AffectiveRatingRequest, PsychomotorRatingRequest};
use rust_schoolhub::models::results::requests::CompileResultsRequest;
use rust_schoolhub::models::scores::requests::{SaveDraftRequest, ScoreEntry, SubmitScoresRequest};
use rust_schoolhub::models::students::entities::Student;
use rust_schoolhub::models::students::requests::CreateStudentRequest;
use rust_schoolhub::models::subjects::entities::SubjectAssignment;
use rust_schoolhub::models::subjects::requests::CreateSubjectAssignmentRequest;
use rust_schoolhub::models::users::entities::{User, UserRole};
use rust_schoolhub::models::users::requests::CreateUserRequest;
use rust_schoolhub::services::{classes, domains, scores};
use rust_schoolhub::storage::Storage;
use rust_schoolhub::storage::sea_orm_storage::SeaOrmStorage;
use rust_schoolhub::utils::password::hash_password_with_params;

pub const YEAR: &str = "2024/2025";
pub const PASSWORD: &str = "Sch00lHub!";

pub struct School {
    pub context: SchoolContext,
    pub admin: User,
    pub teacher: User,
    pub class: Class,
    pub ada: Student,
    pub bola: Student,
    pub maths: SubjectAssignment,
}

pub fn session() -> AcademicSession {
    AcademicSession {
        term: Term::First,
        academic_year: YEAR.to_string(),
    }
}

pub fn class_query(class_id: i64) -> ClassSessionQuery {
    ClassSessionQuery {
        class_id,
        term: Term::First,
        academic_year: YEAR.to_string(),
    }
}

pub async fn new_context() -> SchoolContext {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory storage"),
    );
    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(1_000, 300));
    SchoolContext::new(storage, cache, 300)
}

pub async fn create_account(
    context: &SchoolContext,
    username: &str,
    role: UserRole,
    linked_id: Option<i64>,
) -> User {
    let password = hash_password_with_params(PASSWORD, 8 * 1024, 1, 1).expect("hash");
    context
        .storage()
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password,
            role,
            display_name: None,
            linked_id,
        })
        .await
        .expect("create user")
}

/// 一个班级、两名学生、一门数学课，班主任兼任科目教师
pub async fn setup_school() -> School {
    let context = new_context().await;
    let admin = create_account(&context, "principal", UserRole::Admin, None).await;
    let teacher = create_account(&context, "mrs_bello", UserRole::Teacher, None).await;

    let class = classes::create_class(
        &context,
        &admin,
        CreateClassRequest {
            name: "JSS 1A".to_string(),
            class_teacher_id: Some(teacher.id),
            description: None,
        },
    )
    .await
    .expect("create class");

    let ada = add_student(&context, &admin, class.id, "Ada", "Okafor", "JSS/001").await;
    let bola = add_student(&context, &admin, class.id, "Bola", "Adeyemi", "JSS/002").await;

    let maths = classes::create_subject_assignment(
        &context,
        &admin,
        CreateSubjectAssignmentRequest {
            teacher_id: teacher.id,
            class_id: class.id,
            subject_name: "Mathematics".to_string(),
            term: Term::First,
            academic_year: YEAR.to_string(),
        },
    )
    .await
    .expect("create subject assignment");

    School {
        context,
        admin,
        teacher,
        class,
        ada,
        bola,
        maths,
    }
}

pub async fn add_student(
    context: &SchoolContext,
    admin: &User,
    class_id: i64,
    first_name: &str,
    last_name: &str,
    admission_number: &str,
) -> Student {
    classes::add_student(
        context,
        admin,
        class_id,
        CreateStudentRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            admission_number: admission_number.to_string(),
        },
    )
    .await
    .expect("add student")
}

pub fn entry(student_id: i64, ca1: f64, ca2: f64, exam: f64) -> ScoreEntry {
    ScoreEntry {
        student_id,
        ca1: Some(ca1),
        ca2: Some(ca2),
        exam: Some(exam),
    }
}

impl School {
    /// Ada 总分 75，Bola 总分 55，保存草稿后提交
    pub async fn submit_maths(&self) {
        scores::save_draft(
            &self.context,
            &self.teacher,
            SaveDraftRequest {
                assignment_id: self.maths.id,
                scores: vec![
                    entry(self.ada.id, 15.0, 15.0, 45.0),
                    entry(self.bola.id, 10.0, 10.0, 35.0),
                ],
            },
        )
        .await
        .expect("save draft");

        let outcome = scores::submit_scores(
            &self.context,
            &self.teacher,
            SubmitScoresRequest {
                assignment_id: self.maths.id,
                scores: vec![],
            },
        )
        .await
        .expect("submit scores");
        assert!(matches!(outcome, scores::ScoreSubmitOutcome::Submitted(_)));
    }

    pub async fn rate_affective(&self, student_id: i64) {
        domains::rate_affective(
            &self.context,
            &self.teacher,
            AffectiveRatingRequest {
                student_id,
                class_id: self.class.id,
                term: Term::First,
                academic_year: YEAR.to_string(),
                punctuality: 4,
                neatness: 5,
                politeness: 4,
                honesty: 5,
                relationship_with_others: 3,
                remarks: None,
            },
        )
        .await
        .expect("rate affective");
    }

    pub async fn rate_psychomotor(&self, student_id: i64) {
        domains::rate_psychomotor(
            &self.context,
            &self.teacher,
            PsychomotorRatingRequest {
                student_id,
                class_id: self.class.id,
                term: Term::First,
                academic_year: YEAR.to_string(),
                handwriting: 3,
                verbal_fluency: 4,
                games: 5,
                sports: 4,
                handling_tools: 3,
                drawing_painting: 2,
                remarks: None,
            },
        )
        .await
        .expect("rate psychomotor");
    }

    pub async fn rate_everyone(&self) {
        for id in [self.ada.id, self.bola.id] {
            self.rate_affective(id).await;
            self.rate_psychomotor(id).await;
        }
    }

    pub fn compile_request(&self) -> CompileResultsRequest {
        CompileResultsRequest {
            class_id: self.class.id,
            term: Term::First,
            academic_year: YEAR.to_string(),
            comments: vec![],
            auto_comment: true,
        }
    }
}
