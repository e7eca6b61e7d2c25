mod common;

use common::{School, class_query, create_account, setup_school, session};
use rust_schoolhub::errors::SchoolHubError;
use rust_schoolhub::models::PaginationQuery;
use rust_schoolhub::models::notifications::requests::NotificationListQuery;
use rust_schoolhub::models::results::entities::ResultStatus;
use rust_schoolhub::models::results::requests::{
    ApproveResultsRequest, RejectResultsRequest, StudentComment,
};
use rust_schoolhub::models::users::entities::{User, UserRole};
use rust_schoolhub::services::results::{self, CompileOutcome};
use rust_schoolhub::services::{domains, notifications};

async fn notification_count(school: &School, user: &User) -> i64 {
    notifications::list_notifications(
        &school.context,
        user,
        NotificationListQuery {
            pagination: PaginationQuery { page: 1, size: 20 },
        },
    )
    .await
    .unwrap()
    .pagination
    .total
}

fn approve_request(school: &School) -> ApproveResultsRequest {
    ApproveResultsRequest {
        class_id: school.class.id,
        term: common::session().term,
        academic_year: common::YEAR.to_string(),
    }
}

#[tokio::test]
async fn test_compile_ranks_class_and_notifies_admin() {
    let school = setup_school().await;
    school.submit_maths().await;
    school.rate_everyone().await;

    let mut request = school.compile_request();
    request.comments = vec![StudentComment {
        student_id: school.bola.id,
        comment: "  Needs to practise fractions.  ".to_string(),
    }];

    let outcome = results::compile_results(&school.context, &school.teacher, request)
        .await
        .unwrap();
    let compiled = match outcome {
        CompileOutcome::Compiled(compiled) => compiled,
        other => panic!("expected compiled batch, got {other:?}"),
    };
    assert_eq!(compiled.compiled, 2);
    assert_eq!(compiled.class_average, 65.0);
    assert_eq!(compiled.status, ResultStatus::Submitted);

    let list = results::list_results(&school.context, &school.teacher, class_query(school.class.id))
        .await
        .unwrap();
    assert_eq!(list.items.len(), 2);
    let ada = list.items.iter().find(|r| r.student_id == school.ada.id).unwrap();
    let bola = list.items.iter().find(|r| r.student_id == school.bola.id).unwrap();
    assert_eq!(ada.position, Some(1));
    assert_eq!(bola.position, Some(2));
    assert_eq!(ada.average_score, 75.0);
    assert_eq!(ada.total_students, 2);
    assert_eq!(ada.subjects_count, 1);
    assert_eq!(bola.teacher_comment, "Needs to practise fractions.");
    assert!(!ada.teacher_comment.is_empty());
    assert!(list.items.iter().all(|r| r.status == ResultStatus::Submitted));

    assert_eq!(notification_count(&school, &school.admin).await, 1);
    assert_eq!(notification_count(&school, &school.teacher).await, 0);
}

#[tokio::test]
async fn test_missing_rating_blocks_whole_batch() {
    let school = setup_school().await;
    school.submit_maths().await;
    school.rate_affective(school.ada.id).await;
    school.rate_affective(school.bola.id).await;
    school.rate_psychomotor(school.ada.id).await;

    let outcome =
        results::compile_results(&school.context, &school.teacher, school.compile_request())
            .await
            .unwrap();
    match outcome {
        CompileOutcome::Incomplete(report) => {
            assert_eq!(report.registered_subjects, 1);
            assert_eq!(report.incomplete.len(), 1);
            assert_eq!(report.incomplete[0].student_id, school.bola.id);
            assert_eq!(report.incomplete[0].missing, vec!["psychomotor rating"]);
        }
        other => panic!("expected incomplete report, got {other:?}"),
    }

    let list = results::list_results(&school.context, &school.teacher, class_query(school.class.id))
        .await
        .unwrap();
    assert!(list.items.is_empty());
    assert_eq!(notification_count(&school, &school.admin).await, 0);
}

#[tokio::test]
async fn test_preview_reports_gaps_without_writing() {
    let school = setup_school().await;
    school.rate_everyone().await;

    let preview =
        results::preview_results(&school.context, &school.teacher, class_query(school.class.id))
            .await
            .unwrap();
    assert_eq!(preview.total_students, 2);
    assert_eq!(preview.batch_status, None);
    assert_eq!(preview.completeness.incomplete.len(), 2);
    assert!(
        preview.completeness.incomplete[0]
            .missing
            .contains(&"Mathematics score".to_string())
    );
}

#[tokio::test]
async fn test_submitted_batch_cannot_be_recompiled_or_rerated() {
    let school = setup_school().await;
    school.submit_maths().await;
    school.rate_everyone().await;
    results::compile_results(&school.context, &school.teacher, school.compile_request())
        .await
        .unwrap();

    let err = results::compile_results(&school.context, &school.teacher, school.compile_request())
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::ResultsAlreadySubmitted(_)));

    let err = domains::rate_psychomotor(
        &school.context,
        &school.teacher,
        rust_schoolhub::models::domains::requests::PsychomotorRatingRequest {
            student_id: school.ada.id,
            class_id: school.class.id,
            term: session().term,
            academic_year: common::YEAR.to_string(),
            handwriting: 5,
            verbal_fluency: 5,
            games: 5,
            sports: 5,
            handling_tools: 5,
            drawing_painting: 5,
            remarks: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::ResultsAlreadySubmitted(_)));
}

#[tokio::test]
async fn test_reject_then_resubmit() {
    let school = setup_school().await;
    school.submit_maths().await;
    school.rate_everyone().await;
    results::compile_results(&school.context, &school.teacher, school.compile_request())
        .await
        .unwrap();

    let blank = RejectResultsRequest {
        class_id: school.class.id,
        term: session().term,
        academic_year: common::YEAR.to_string(),
        reason: "   ".to_string(),
        unlock_scores: false,
    };
    let err = results::reject_results(&school.context, &school.admin, blank)
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Validation(_)));

    let rejected = results::reject_results(
        &school.context,
        &school.admin,
        RejectResultsRequest {
            class_id: school.class.id,
            term: session().term,
            academic_year: common::YEAR.to_string(),
            reason: "Comments are too short".to_string(),
            unlock_scores: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(rejected.updated, 2);
    assert_eq!(rejected.status, ResultStatus::Rejected);

    let preview =
        results::preview_results(&school.context, &school.teacher, class_query(school.class.id))
            .await
            .unwrap();
    assert_eq!(preview.batch_status, Some(ResultStatus::Rejected));
    assert_eq!(preview.rejection_reason.as_deref(), Some("Comments are too short"));

    let outcome =
        results::compile_results(&school.context, &school.teacher, school.compile_request())
            .await
            .unwrap();
    assert!(matches!(outcome, CompileOutcome::Compiled(ref c) if c.compiled == 2));

    let list = results::list_results(&school.context, &school.admin, class_query(school.class.id))
        .await
        .unwrap();
    assert_eq!(list.items.len(), 2);
    assert!(list.items.iter().all(|r| r.status == ResultStatus::Submitted));
    assert!(list.items.iter().all(|r| r.rejection_reason.is_none()));

    assert_eq!(notification_count(&school, &school.admin).await, 2);
    assert_eq!(notification_count(&school, &school.teacher).await, 1);
}

#[tokio::test]
async fn test_approval_rules_and_parent_visibility() {
    let school = setup_school().await;
    school.submit_maths().await;
    school.rate_everyone().await;

    // 尚未提交的批次不能审核
    let err = results::approve_results(&school.context, &school.admin, approve_request(&school))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::InvalidTransition(_)));

    results::compile_results(&school.context, &school.teacher, school.compile_request())
        .await
        .unwrap();

    let err = results::approve_results(&school.context, &school.teacher, approve_request(&school))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authorization(_)));

    let parent =
        create_account(&school.context, "ada_mum", UserRole::Parent, Some(school.ada.id)).await;
    let before = results::student_results(&school.context, &parent, school.ada.id)
        .await
        .unwrap();
    assert!(before.items.is_empty());

    let approved =
        results::approve_results(&school.context, &school.admin, approve_request(&school))
            .await
            .unwrap();
    assert_eq!(approved.updated, 2);

    let after = results::student_results(&school.context, &parent, school.ada.id)
        .await
        .unwrap();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].status, ResultStatus::Approved);
    assert_eq!(after.items[0].approved_by, Some(school.admin.id));

    let err = results::student_results(&school.context, &parent, school.bola.id)
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authorization(_)));

    let err = results::reject_results(
        &school.context,
        &school.admin,
        RejectResultsRequest {
            class_id: school.class.id,
            term: session().term,
            academic_year: common::YEAR.to_string(),
            reason: "Too late".to_string(),
            unlock_scores: false,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::InvalidTransition(_)));
}
