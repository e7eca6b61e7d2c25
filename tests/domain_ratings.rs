mod common;

use common::{YEAR, class_query, create_account, setup_school};
use rust_schoolhub::errors::SchoolHubError;
use rust_schoolhub::models::common::Term;
use rust_schoolhub::models::domains::requests::AffectiveRatingRequest;
use rust_schoolhub::models::users::entities::UserRole;
use rust_schoolhub::services::domains;

fn affective(student_id: i64, class_id: i64, punctuality: i16) -> AffectiveRatingRequest {
    AffectiveRatingRequest {
        student_id,
        class_id,
        term: Term::First,
        academic_year: YEAR.to_string(),
        punctuality,
        neatness: 4,
        politeness: 4,
        honesty: 5,
        relationship_with_others: 4,
        remarks: Some("Always early".to_string()),
    }
}

#[tokio::test]
async fn test_rating_is_upserted_per_student_and_session() {
    let school = setup_school().await;

    domains::rate_affective(
        &school.context,
        &school.teacher,
        affective(school.ada.id, school.class.id, 2),
    )
    .await
    .unwrap();
    let updated = domains::rate_affective(
        &school.context,
        &school.teacher,
        affective(school.ada.id, school.class.id, 5),
    )
    .await
    .unwrap();
    assert_eq!(updated.punctuality, 5);
    school.rate_psychomotor(school.bola.id).await;

    let listed =
        domains::list_domains(&school.context, &school.teacher, class_query(school.class.id))
            .await
            .unwrap();
    assert_eq!(listed.affective.len(), 1);
    assert_eq!(listed.affective[0].student_id, school.ada.id);
    assert_eq!(listed.affective[0].punctuality, 5);
    assert_eq!(listed.psychomotor.len(), 1);
    assert_eq!(listed.psychomotor[0].student_id, school.bola.id);
}

#[tokio::test]
async fn test_rating_bounds_and_membership() {
    let school = setup_school().await;

    let err = domains::rate_affective(
        &school.context,
        &school.teacher,
        affective(school.ada.id, school.class.id, 6),
    )
    .await
    .unwrap_err();
    match err {
        SchoolHubError::Validation(msg) => assert!(msg.contains("punctuality")),
        other => panic!("unexpected error: {other}"),
    }

    let zero = domains::rate_affective(
        &school.context,
        &school.teacher,
        affective(school.ada.id, school.class.id, 0),
    )
    .await;
    assert!(matches!(zero, Err(SchoolHubError::Validation(_))));

    let stranger = domains::rate_affective(
        &school.context,
        &school.teacher,
        affective(9_999, school.class.id, 3),
    )
    .await;
    assert!(matches!(stranger, Err(SchoolHubError::Validation(_))));

    let listed =
        domains::list_domains(&school.context, &school.admin, class_query(school.class.id))
            .await
            .unwrap();
    assert!(listed.affective.is_empty());
}

#[tokio::test]
async fn test_only_class_teacher_or_admin_may_rate() {
    let school = setup_school().await;
    let other_teacher = create_account(&school.context, "mr_okon", UserRole::Teacher, None).await;

    let denied = domains::rate_affective(
        &school.context,
        &other_teacher,
        affective(school.ada.id, school.class.id, 3),
    )
    .await;
    assert!(matches!(denied, Err(SchoolHubError::Authorization(_))));

    let hidden =
        domains::list_domains(&school.context, &other_teacher, class_query(school.class.id)).await;
    assert!(matches!(hidden, Err(SchoolHubError::Authorization(_))));

    let by_admin = domains::rate_affective(
        &school.context,
        &school.admin,
        affective(school.ada.id, school.class.id, 3),
    )
    .await
    .unwrap();
    assert_eq!(by_admin.rated_by, school.admin.id);
}
