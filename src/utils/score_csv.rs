//! 成绩表 CSV 导入导出
//!
//! 表头固定为 `student_name,admission_number,ca1,ca2,exam`，空单元格表示未录入。
//! 含逗号、引号的姓名由 csv crate 自动加引号转义。

use std::collections::HashMap;
use std::io::Cursor;

use crate::errors::Result;
use crate::models::ErrorCode;
use crate::models::scores::responses::{ImportRowError, ScoreSheetRow};

pub const HEADERS: [&str; 5] = ["student_name", "admission_number", "ca1", "ca2", "exam"];

/// 导入解析错误
#[derive(Debug, Clone, PartialEq)]
pub enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
}

impl ImportParseError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile => ErrorCode::ImportFileDataInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "The file contains no data rows".to_string(),
        }
    }
}

/// 导入的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedScoreRow {
    /// 1 起始，含表头行
    pub row: usize,
    pub student_name: String,
    pub admission_number: String,
    pub ca1: Option<f64>,
    pub ca2: Option<f64>,
    pub exam: Option<f64>,
}

impl ImportedScoreRow {
    pub fn has_any_value(&self) -> bool {
        self.ca1.is_some() || self.ca2.is_some() || self.exam.is_some()
    }
}

/// 解析结果：可用行 + 格式错误行
#[derive(Debug, Default)]
pub struct ParsedScoreSheet {
    pub rows: Vec<ImportedScoreRow>,
    pub errors: Vec<ImportRowError>,
    pub total: usize,
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// 导出成绩表
pub fn write_score_sheet(rows: &[ScoreSheetRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record([
            row.student_name.clone(),
            row.admission_number.clone(),
            format_value(row.ca1),
            format_value(row.ca2),
            format_value(row.exam),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| crate::errors::SchoolHubError::serialization(e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| crate::errors::SchoolHubError::serialization(e.to_string()))
}

fn parse_value(raw: &str) -> std::result::Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{trimmed}' is not a number"))
}

/// 解析上传的成绩表
pub fn parse_score_sheet(data: &[u8]) -> std::result::Result<ParsedScoreSheet, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header: {e}")))?;
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_lowercase(), i))
        .collect();

    let column = |name: &str| {
        header_map
            .get(name)
            .copied()
            .ok_or_else(|| ImportParseError::MissingColumn(name.to_string()))
    };
    let admission_idx = column("admission_number")?;
    let ca1_idx = column("ca1")?;
    let ca2_idx = column("ca2")?;
    let exam_idx = column("exam")?;
    let name_idx = header_map.get("student_name").copied();

    let mut parsed = ParsedScoreSheet::default();

    for (i, result) in rdr.records().enumerate() {
        let row = i + 2;
        parsed.total += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.errors.push(ImportRowError {
                    row,
                    field: String::new(),
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };

        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let mut values = [None; 3];
        let mut row_ok = true;
        for (slot, (field, idx)) in [("ca1", ca1_idx), ("ca2", ca2_idx), ("exam", exam_idx)]
            .into_iter()
            .enumerate()
        {
            match parse_value(&cell(idx)) {
                Ok(v) => values[slot] = v,
                Err(message) => {
                    row_ok = false;
                    parsed.errors.push(ImportRowError {
                        row,
                        field: field.to_string(),
                        message,
                    });
                }
            }
        }

        if row_ok {
            parsed.rows.push(ImportedScoreRow {
                row,
                student_name: name_idx.map(cell).unwrap_or_default().trim().to_string(),
                admission_number: cell(admission_idx).trim().to_string(),
                ca1: values[0],
                ca2: values[1],
                exam: values[2],
            });
        }
    }

    if parsed.total == 0 {
        return Err(ImportParseError::EmptyFile);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_row(
        name: &str,
        adm: &str,
        ca1: Option<f64>,
        ca2: Option<f64>,
        exam: Option<f64>,
    ) -> ScoreSheetRow {
        ScoreSheetRow {
            student_id: 1,
            student_name: name.to_string(),
            admission_number: adm.to_string(),
            ca1,
            ca2,
            exam,
            total: None,
            grade: None,
            remark: None,
            status: None,
            subject_position: None,
        }
    }

    #[test]
    fn test_export_then_import_reproduces_components() {
        let rows = vec![
            sheet_row("Okafor, Ada", "ADM-001", Some(15.0), Some(12.5), Some(48.0)),
            sheet_row("Bello \"BJ\" Jide", "ADM-002", Some(10.0), None, None),
        ];
        let csv_text = write_score_sheet(&rows).unwrap();
        assert!(csv_text.starts_with("student_name,admission_number,ca1,ca2,exam"));
        assert!(csv_text.contains("\"Okafor, Ada\""));

        let parsed = parse_score_sheet(csv_text.as_bytes()).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.rows[0].student_name, "Okafor, Ada");
        assert_eq!(
            (parsed.rows[0].ca1, parsed.rows[0].ca2, parsed.rows[0].exam),
            (Some(15.0), Some(12.5), Some(48.0))
        );
        assert_eq!(parsed.rows[1].student_name, "Bello \"BJ\" Jide");
        assert_eq!(
            (parsed.rows[1].ca1, parsed.rows[1].ca2, parsed.rows[1].exam),
            (Some(10.0), None, None)
        );
    }

    #[test]
    fn test_non_numeric_cell_is_row_error() {
        let data =
            "student_name,admission_number,ca1,ca2,exam\nAda,ADM-1,ten,5,40\nBola,ADM-2,1,2,3\n";
        let parsed = parse_score_sheet(data.as_bytes()).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert_eq!(parsed.errors[0].field, "ca1");
    }

    #[test]
    fn test_unreadable_row_is_skipped() {
        let mut data = b"student_name,admission_number,ca1,ca2,exam\n".to_vec();
        data.extend_from_slice(b"Ad\xffa,ADM-1,10,10,40\n");
        data.extend_from_slice(b"Bola,ADM-2,1,2,3\n");

        let parsed = parse_score_sheet(&data).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].admission_number, "ADM-2");
        assert_eq!(parsed.rows[0].row, 3);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert!(parsed.errors[0].field.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let data = "student_name,admission_number,ca1,ca2\nAda,ADM-1,1,2\n";
        let err = parse_score_sheet(data.as_bytes()).unwrap_err();
        assert_eq!(err, ImportParseError::MissingColumn("exam".to_string()));
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
    }

    #[test]
    fn test_empty_file() {
        let data = "student_name,admission_number,ca1,ca2,exam\n";
        assert_eq!(
            parse_score_sheet(data.as_bytes()).unwrap_err(),
            ImportParseError::EmptyFile
        );
    }
}
