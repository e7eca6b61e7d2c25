pub mod auth;
pub mod classes;
pub mod common;
pub mod domains;
pub mod notifications;
pub mod results;
pub mod scores;
pub mod students;
pub mod subjects;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

use crate::errors::SchoolHubError;

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ValidationFailed = 1006,

    // 认证
    AuthFailed = 2000,

    // 用户
    UserAlreadyExists = 3001,

    // 班级、学生、科目
    ClassAlreadyExists = 4001,
    StudentAlreadyExists = 4101,
    SubjectAssignmentAlreadyExists = 4201,

    // 成绩录入
    ScoreOutOfRange = 5000,
    ScoreLocked = 5001,
    ScoresAlreadySubmitted = 5002,
    ScoresIncomplete = 5003,
    ImportFileParseFailed = 5100,
    ImportFileMissingColumn = 5101,
    ImportFileDataInvalid = 5102,
    FileUploadFailed = 5103,

    // 成绩单汇总
    ResultsIncomplete = 6000,
    ResultsAlreadySubmitted = 6001,
    InvalidTransition = 6004,
}

impl From<&SchoolHubError> for ErrorCode {
    fn from(err: &SchoolHubError) -> Self {
        match err {
            SchoolHubError::Validation(_) => ErrorCode::ValidationFailed,
            SchoolHubError::NotFound(_) => ErrorCode::NotFound,
            SchoolHubError::Authentication(_) => ErrorCode::Unauthorized,
            SchoolHubError::Authorization(_) => ErrorCode::Forbidden,
            SchoolHubError::ScoreOutOfRange(_) => ErrorCode::ScoreOutOfRange,
            SchoolHubError::ScoreLocked(_) => ErrorCode::ScoreLocked,
            SchoolHubError::ScoresAlreadySubmitted(_) => ErrorCode::ScoresAlreadySubmitted,
            SchoolHubError::ResultsIncomplete(_) => ErrorCode::ResultsIncomplete,
            SchoolHubError::ResultsAlreadySubmitted(_) => ErrorCode::ResultsAlreadySubmitted,
            SchoolHubError::InvalidTransition(_) => ErrorCode::InvalidTransition,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&SchoolHubError::score_locked("x")),
            ErrorCode::ScoreLocked
        );
        assert_eq!(
            ErrorCode::from(&SchoolHubError::results_already_submitted("x")),
            ErrorCode::ResultsAlreadySubmitted
        );
        assert_eq!(
            ErrorCode::from(&SchoolHubError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(ErrorCode::Success as i32, 0);
    }
}
