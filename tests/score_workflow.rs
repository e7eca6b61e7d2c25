mod common;

use common::{School, entry, setup_school};
use rust_schoolhub::errors::SchoolHubError;
use rust_schoolhub::models::scores::entities::ScoreStatus;
use rust_schoolhub::models::scores::requests::{
    SaveDraftRequest, ScoreEntry, SubmitScoresRequest, UnlockScoresRequest,
};
use rust_schoolhub::models::scores::responses::SheetStatus;
use rust_schoolhub::services::scores::{self, ScoreSubmitOutcome};
use rust_schoolhub::utils::score_csv::parse_score_sheet;

async fn draft(school: &School, scores: Vec<ScoreEntry>) -> Result<usize, SchoolHubError> {
    scores::save_draft(
        &school.context,
        &school.teacher,
        SaveDraftRequest {
            assignment_id: school.maths.id,
            scores,
        },
    )
    .await
    .map(|r| r.saved)
}

#[tokio::test]
async fn test_submit_ranks_and_locks_sheet() {
    let school = setup_school().await;
    school.submit_maths().await;

    let sheet = scores::load_score_sheet(&school.context, &school.teacher, school.maths.id)
        .await
        .unwrap();
    assert_eq!(sheet.status, SheetStatus::Submitted);
    assert_eq!(sheet.class_average, Some(65.0));
    assert_eq!(sheet.class_min, Some(55.0));
    assert_eq!(sheet.class_max, Some(75.0));

    let ada = sheet.rows.iter().find(|r| r.student_id == school.ada.id).unwrap();
    let bola = sheet.rows.iter().find(|r| r.student_id == school.bola.id).unwrap();
    assert_eq!(ada.total, Some(75.0));
    assert_eq!(ada.subject_position, Some(1));
    assert_eq!(bola.subject_position, Some(2));
    assert_eq!(ada.status, Some(ScoreStatus::Submitted));
}

#[tokio::test]
async fn test_locked_scores_reject_edits_and_resubmission() {
    let school = setup_school().await;
    school.submit_maths().await;

    let err = draft(&school, vec![entry(school.ada.id, 20.0, 20.0, 60.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::ScoreLocked(_)));

    let err = scores::submit_scores(
        &school.context,
        &school.teacher,
        SubmitScoresRequest {
            assignment_id: school.maths.id,
            scores: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::ScoresAlreadySubmitted(_)));
}

#[tokio::test]
async fn test_only_admin_can_unlock() {
    let school = setup_school().await;
    school.submit_maths().await;
    let unlock = || UnlockScoresRequest {
        assignment_id: school.maths.id,
    };

    let err = scores::unlock_scores(&school.context, &school.teacher, unlock())
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authorization(_)));

    let unlocked = scores::unlock_scores(&school.context, &school.admin, unlock())
        .await
        .unwrap();
    assert_eq!(unlocked.unlocked, 2);

    let saved = draft(&school, vec![entry(school.ada.id, 20.0, 20.0, 60.0)])
        .await
        .unwrap();
    assert_eq!(saved, 1);

    let sheet = scores::load_score_sheet(&school.context, &school.teacher, school.maths.id)
        .await
        .unwrap();
    assert_eq!(sheet.status, SheetStatus::Draft);
    assert_eq!(sheet.class_average, None);
}

#[tokio::test]
async fn test_out_of_range_draft_writes_nothing() {
    let school = setup_school().await;

    let err = draft(
        &school,
        vec![
            entry(school.ada.id, 15.0, 15.0, 45.0),
            entry(school.bola.id, 21.0, 10.0, 35.0),
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::ScoreOutOfRange(_)));

    let sheet = scores::load_score_sheet(&school.context, &school.teacher, school.maths.id)
        .await
        .unwrap();
    assert_eq!(sheet.status, SheetStatus::Empty);
    assert!(sheet.rows.iter().all(|r| r.total.is_none()));
}

#[tokio::test]
async fn test_incomplete_submission_lists_missing_fields() {
    let school = setup_school().await;
    draft(
        &school,
        vec![
            entry(school.ada.id, 15.0, 15.0, 45.0),
            ScoreEntry {
                student_id: school.bola.id,
                ca1: Some(10.0),
                ca2: None,
                exam: None,
            },
        ],
    )
    .await
    .unwrap();

    let outcome = scores::submit_scores(
        &school.context,
        &school.teacher,
        SubmitScoresRequest {
            assignment_id: school.maths.id,
            scores: vec![],
        },
    )
    .await
    .unwrap();

    match outcome {
        ScoreSubmitOutcome::Incomplete(report) => {
            assert_eq!(report.missing.len(), 1);
            assert_eq!(report.missing[0].student_id, school.bola.id);
            assert_eq!(report.missing[0].missing_fields, vec!["ca2", "exam"]);
        }
        other => panic!("expected incomplete outcome, got {other:?}"),
    }

    // 提交时附带的改动与草稿合并
    let outcome = scores::submit_scores(
        &school.context,
        &school.teacher,
        SubmitScoresRequest {
            assignment_id: school.maths.id,
            scores: vec![ScoreEntry {
                student_id: school.bola.id,
                ca1: None,
                ca2: Some(10.0),
                exam: Some(35.0),
            }],
        },
    )
    .await
    .unwrap();
    assert!(matches!(outcome, ScoreSubmitOutcome::Submitted(ref r) if r.submitted == 2));
}

#[tokio::test]
async fn test_other_teacher_cannot_enter_scores() {
    let school = setup_school().await;
    let outsider = common::create_account(
        &school.context,
        "mr_musa",
        rust_schoolhub::models::users::entities::UserRole::Teacher,
        None,
    )
    .await;

    let err = scores::save_draft(
        &school.context,
        &outsider,
        SaveDraftRequest {
            assignment_id: school.maths.id,
            scores: vec![entry(school.ada.id, 15.0, 15.0, 45.0)],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchoolHubError::Authorization(_)));
}

#[tokio::test]
async fn test_export_then_import_sheet() {
    let school = setup_school().await;
    draft(&school, vec![entry(school.ada.id, 12.5, 18.0, 50.0)])
        .await
        .unwrap();

    let export = scores::export_score_sheet(&school.context, &school.teacher, school.maths.id)
        .await
        .unwrap();
    assert_eq!(export.file_name, format!("scores_mathematics_{}.csv", school.maths.id));
    assert!(export.content.starts_with("student_name,admission_number,ca1,ca2,exam"));
    assert!(export.content.contains("JSS/001"));

    let parsed = parse_score_sheet(export.content.as_bytes()).unwrap();
    assert_eq!(parsed.total, 2);

    let report =
        scores::import_score_rows(&school.context, &school.teacher, school.maths.id, parsed)
            .await
            .unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].message, "Row has no scores");
}

#[tokio::test]
async fn test_import_skips_bad_rows_and_keeps_good_ones() {
    let school = setup_school().await;
    let csv = "student_name,admission_number,ca1,ca2,exam\n\
               Ada Okafor,JSS/001,15,15,45\n\
               Nobody,JSS/999,10,10,30\n\
               Bola Adeyemi,JSS/002,10,10,75\n\
               Ada Again,JSS/001,1,1,1\n";

    let parsed = parse_score_sheet(csv.as_bytes()).unwrap();
    let report =
        scores::import_score_rows(&school.context, &school.teacher, school.maths.id, parsed)
            .await
            .unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 3);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![3, 4, 5]);
    assert_eq!(report.errors[1].field, "exam");

    let sheet = scores::load_score_sheet(&school.context, &school.teacher, school.maths.id)
        .await
        .unwrap();
    let ada = sheet.rows.iter().find(|r| r.student_id == school.ada.id).unwrap();
    assert_eq!(ada.total, Some(75.0));
    assert_eq!(ada.status, Some(ScoreStatus::Draft));
}

#[tokio::test]
async fn test_import_takes_first_valid_row_per_student() {
    let school = setup_school().await;
    let csv = "student_name,admission_number,ca1,ca2,exam\n\
               Bola Adeyemi,JSS/002,25,10,40\n\
               Bola Adeyemi,JSS/002,12,14,30\n\
               Bola Adeyemi,JSS/002,1,1,1\n";

    let parsed = parse_score_sheet(csv.as_bytes()).unwrap();
    let report =
        scores::import_score_rows(&school.context, &school.teacher, school.maths.id, parsed)
            .await
            .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.errors[0].row, 2);
    assert_eq!(report.errors[0].field, "ca1");
    assert_eq!(report.errors[1].row, 4);
    assert_eq!(report.errors[1].message, "Duplicate admission number in file");

    let sheet = scores::load_score_sheet(&school.context, &school.teacher, school.maths.id)
        .await
        .unwrap();
    let bola = sheet.rows.iter().find(|r| r.student_id == school.bola.id).unwrap();
    assert_eq!(bola.total, Some(56.0));
}
