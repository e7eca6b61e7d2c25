mod common;

use common::{PASSWORD, YEAR, add_student, setup_school};
use rust_schoolhub::errors::SchoolHubError;
use rust_schoolhub::models::PaginationQuery;
use rust_schoolhub::models::auth::LoginRequest;
use rust_schoolhub::models::classes::requests::{ClassQueryParams, CreateClassRequest};
use rust_schoolhub::models::common::Term;
use rust_schoolhub::models::students::requests::CreateStudentRequest;
use rust_schoolhub::models::subjects::requests::{
    ClassSubjectsQuery, CreateSubjectAssignmentRequest,
};
use rust_schoolhub::models::users::entities::UserRole;
use rust_schoolhub::models::users::requests::CreateUserRequest;
use rust_schoolhub::services::{auth, classes, users};

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_checks_password_and_records_last_login() {
    let school = setup_school().await;

    let user = auth::login(&school.context, &login_request("mrs_bello", PASSWORD))
        .await
        .unwrap();
    assert_eq!(user.id, school.teacher.id);

    let by_email = auth::login(&school.context, &login_request("mrs_bello@school.test", PASSWORD))
        .await
        .unwrap();
    assert_eq!(by_email.id, school.teacher.id);

    let stored = school
        .context
        .storage()
        .get_user_by_id(school.teacher.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login.is_some());

    let err = auth::login(&school.context, &login_request("mrs_bello", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authentication(_)));

    let err = auth::login(&school.context, &login_request("ghost", PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authentication(_)));
}

#[tokio::test]
async fn test_create_user_validation() {
    let school = setup_school().await;
    let request = |role, linked_id, password: &str| CreateUserRequest {
        username: "new_parent".to_string(),
        email: "parent@school.test".to_string(),
        password: password.to_string(),
        role,
        display_name: None,
        linked_id,
    };

    let err = users::create_user(
        &school.context,
        &school.teacher,
        request(UserRole::Teacher, None, PASSWORD),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authorization(_)));

    let err = users::create_user(
        &school.context,
        &school.admin,
        request(UserRole::Parent, None, PASSWORD),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::Validation(_)));

    let err = users::create_user(
        &school.context,
        &school.admin,
        request(UserRole::Parent, Some(9_999), PASSWORD),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::NotFound(_)));

    let err = users::create_user(
        &school.context,
        &school.admin,
        request(UserRole::Accountant, None, "short"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::Validation(_)));
}

#[tokio::test]
async fn test_students_and_roster() {
    let school = setup_school().await;

    let roster = classes::list_students(&school.context, school.class.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 2);

    let chidi = add_student(
        &school.context,
        &school.admin,
        school.class.id,
        "Chidi",
        "Eze",
        "JSS/003",
    )
    .await;
    let roster = classes::list_students(&school.context, school.class.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 3);
    assert!(roster.iter().any(|s| s.id == chidi.id));

    let duplicate = classes::add_student(
        &school.context,
        &school.admin,
        school.class.id,
        CreateStudentRequest {
            first_name: "Other".to_string(),
            last_name: "Child".to_string(),
            admission_number: "JSS/001".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate, SchoolHubError::AlreadyExists(_)));

    let invalid = classes::add_student(
        &school.context,
        &school.admin,
        school.class.id,
        CreateStudentRequest {
            first_name: "Bad".to_string(),
            last_name: "Number".to_string(),
            admission_number: "JSS 004".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(invalid, SchoolHubError::Validation(_)));

    let missing = classes::list_students(&school.context, 9_999).await.unwrap_err();
    assert!(matches!(missing, SchoolHubError::NotFound(_)));
}

#[tokio::test]
async fn test_subject_assignments() {
    let school = setup_school().await;
    let query = || ClassSubjectsQuery {
        term: Term::First,
        academic_year: YEAR.to_string(),
    };

    let subjects = classes::list_subjects(&school.context, school.class.id, query())
        .await
        .unwrap();
    assert_eq!(subjects.len(), 1);

    classes::create_subject_assignment(
        &school.context,
        &school.admin,
        CreateSubjectAssignmentRequest {
            teacher_id: school.teacher.id,
            class_id: school.class.id,
            subject_name: "English".to_string(),
            term: Term::First,
            academic_year: YEAR.to_string(),
        },
    )
    .await
    .unwrap();

    let subjects = classes::list_subjects(&school.context, school.class.id, query())
        .await
        .unwrap();
    assert_eq!(subjects.len(), 2);

    let duplicate = classes::create_subject_assignment(
        &school.context,
        &school.admin,
        CreateSubjectAssignmentRequest {
            teacher_id: school.teacher.id,
            class_id: school.class.id,
            subject_name: "English".to_string(),
            term: Term::First,
            academic_year: YEAR.to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate, SchoolHubError::AlreadyExists(_)));

    let not_teacher = classes::create_subject_assignment(
        &school.context,
        &school.admin,
        CreateSubjectAssignmentRequest {
            teacher_id: school.admin.id,
            class_id: school.class.id,
            subject_name: "Civics".to_string(),
            term: Term::First,
            academic_year: YEAR.to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(not_teacher, SchoolHubError::Validation(_)));

    let bad_year = classes::list_subjects(
        &school.context,
        school.class.id,
        ClassSubjectsQuery {
            term: Term::First,
            academic_year: "2024-2025".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(bad_year, SchoolHubError::Validation(_)));
}

#[tokio::test]
async fn test_class_list_counts_and_search() {
    let school = setup_school().await;
    classes::create_class(
        &school.context,
        &school.admin,
        CreateClassRequest {
            name: "SS 2B".to_string(),
            class_teacher_id: None,
            description: Some("Science stream".to_string()),
        },
    )
    .await
    .unwrap();

    let all = classes::list_classes(&school.context, ClassQueryParams::default())
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 2);
    let names: Vec<&str> = all.items.iter().map(|c| c.class.name.as_str()).collect();
    assert_eq!(names, vec!["JSS 1A", "SS 2B"]);
    assert_eq!(all.items[0].student_count, 2);
    assert_eq!(all.items[0].subject_count, 1);
    assert_eq!(all.items[1].student_count, 0);

    let searched = classes::list_classes(
        &school.context,
        ClassQueryParams {
            pagination: PaginationQuery { page: 1, size: 1 },
            search: Some("  JSS ".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.pagination.total, 1);
    assert_eq!(searched.items[0].class.id, school.class.id);

    let bad_page = classes::list_classes(
        &school.context,
        ClassQueryParams {
            pagination: PaginationQuery { page: 0, size: 10 },
            search: None,
        },
    )
    .await;
    assert!(matches!(bad_page, Err(SchoolHubError::Validation(_))));

    let teacher_class = classes::create_class(
        &school.context,
        &school.teacher,
        CreateClassRequest {
            name: "JSS 3C".to_string(),
            class_teacher_id: None,
            description: None,
        },
    )
    .await;
    assert!(matches!(teacher_class, Err(SchoolHubError::Authorization(_))));
}
