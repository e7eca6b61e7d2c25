//! 成绩表 CSV 导入导出

use std::collections::{HashMap, HashSet};

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use tracing::info;

use super::ScoreService;
use super::sheet::build_sheet;
use crate::config::AppConfig;
use crate::context::SchoolContext;
use crate::errors::Result;
use crate::models::scores::responses::{ImportRowError, ScoreImportResponse};
use crate::models::students::entities::Student;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_sheet_viewer, ensure_subject_teacher, load_assignment};
use crate::services::{current_user, error_response};
use crate::utils::grading::{CA_MAX, EXAM_MAX, build_score_write, validate_component};
use crate::utils::score_csv::{ParsedScoreSheet, parse_score_sheet, write_score_sheet};

/// 导出文件
#[derive(Debug)]
pub struct ScoreSheetExport {
    pub file_name: String,
    pub content: String,
}

fn export_file_name(subject_name: &str, assignment_id: i64) -> String {
    let slug: String = subject_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("scores_{slug}_{assignment_id}.csv")
}

/// 导出成绩表，每个在读学生一行
pub async fn export_score_sheet(
    context: &SchoolContext,
    user: &User,
    assignment_id: i64,
) -> Result<ScoreSheetExport> {
    let assignment = load_assignment(context, assignment_id).await?;
    ensure_sheet_viewer(context, user, &assignment).await?;

    let file_name = export_file_name(&assignment.subject_name, assignment.id);
    let sheet = build_sheet(context, assignment).await?;
    let content = write_score_sheet(&sheet.rows)?;

    Ok(ScoreSheetExport { file_name, content })
}

fn row_error(row: usize, field: &str, message: impl Into<String>) -> ImportRowError {
    ImportRowError {
        row,
        field: field.to_string(),
        message: message.into(),
    }
}

/// 导入已解析的成绩行
///
/// 每行独立校验：学号未知、无分数、越界或对应成绩已提交的行被跳过并记录原因，
/// 其余行作为草稿一次性写入。同一学号只取第一条通过校验的行，之后的视为重复。
pub async fn import_score_rows(
    context: &SchoolContext,
    user: &User,
    assignment_id: i64,
    parsed: ParsedScoreSheet,
) -> Result<ScoreImportResponse> {
    let assignment = load_assignment(context, assignment_id).await?;
    ensure_subject_teacher(user, &assignment)?;

    let roster = context.class_roster(assignment.class_id).await?;
    let by_admission: HashMap<&str, &Student> = roster
        .iter()
        .map(|s| (s.admission_number.as_str(), s))
        .collect();
    let locked: HashSet<i64> = context
        .storage()
        .list_scores_by_assignment(assignment.id)
        .await?
        .into_iter()
        .filter(|s| s.is_locked())
        .map(|s| s.student_id)
        .collect();

    let ParsedScoreSheet {
        rows,
        mut errors,
        total,
    } = parsed;
    let mut seen = HashSet::new();
    let mut writes = Vec::new();

    for row in rows {
        let Some(student) = by_admission.get(row.admission_number.as_str()) else {
            errors.push(row_error(
                row.row,
                "admission_number",
                format!(
                    "No active student with admission number '{}'",
                    row.admission_number
                ),
            ));
            continue;
        };
        if !row.has_any_value() {
            errors.push(row_error(row.row, "", "Row has no scores"));
            continue;
        }
        if locked.contains(&student.id) {
            errors.push(row_error(
                row.row,
                "status",
                "Score is already submitted and cannot be changed",
            ));
            continue;
        }

        let bounds = [
            ("ca1", row.ca1, CA_MAX),
            ("ca2", row.ca2, CA_MAX),
            ("exam", row.exam, EXAM_MAX),
        ];
        if let Some((field, message)) = bounds.iter().find_map(|(field, value, max)| {
            validate_component(field, *value, *max)
                .err()
                .map(|msg| (*field, msg))
        }) {
            errors.push(row_error(row.row, field, message));
            continue;
        }
        if !seen.insert(student.id) {
            errors.push(row_error(
                row.row,
                "admission_number",
                "Duplicate admission number in file",
            ));
            continue;
        }

        writes.push(build_score_write(student.id, row.ca1, row.ca2, row.exam));
    }

    let imported = context
        .storage()
        .save_draft_scores(assignment.id, user.id, writes)
        .await?;

    info!(
        "Score import for assignment {} by user {}: {} of {} row(s) imported",
        assignment.id, user.id, imported, total
    );

    errors.sort_by_key(|e| e.row);
    Ok(ScoreImportResponse {
        total,
        imported,
        skipped: total - imported,
        errors,
    })
}

pub async fn handle_export(
    service: &ScoreService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match export_score_sheet(&context, &user, assignment_id).await {
        Ok(export) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", export.file_name),
            ))
            .body(export.content)),
        Err(e) => Ok(error_response(&e, "Failed to export score sheet")),
    }
}

pub async fn handle_import(
    service: &ScoreService,
    request: &HttpRequest,
    assignment_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 读取文件内容
    let file_bytes = match read_file_from_multipart(&mut payload).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                format!("Failed to read uploaded file: {e}"),
            )));
        }
    };

    let parsed = match parse_score_sheet(&file_bytes) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    let max_rows = AppConfig::get().school.max_import_rows;
    if parsed.total > max_rows {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportFileDataInvalid,
            format!("A single import supports at most {max_rows} rows"),
        )));
    }

    match import_score_rows(&context, &user, assignment_id, parsed).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Import completed"))),
        Err(e) => Ok(error_response(&e, "Failed to import scores")),
    }
}

async fn read_file_from_multipart(payload: &mut Multipart) -> std::result::Result<Vec<u8>, String> {
    let mut file_bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("failed to read field: {e}"))?;

        if field.name().map(|n| n == "file").unwrap_or(false) {
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("failed to read data: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("no 'file' field found".to_string());
    }

    Ok(file_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name_is_slugged() {
        assert_eq!(
            export_file_name("Basic Science", 12),
            "scores_basic_science_12.csv"
        );
    }
}
