//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schoolhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolHubError {
            $($variant(String),)*
        }

        impl SchoolHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    AlreadyExists("E010", "Resource Already Exists"),
    Serialization("E009", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    ScoreOutOfRange("E101", "Score Out Of Range"),
    ScoreLocked("E102", "Score Locked"),
    ScoresAlreadySubmitted("E103", "Scores Already Submitted"),
    ResultsIncomplete("E104", "Results Incomplete"),
    ResultsAlreadySubmitted("E105", "Results Already Submitted"),
    InvalidTransition("E106", "Invalid Status Transition"),
}

impl SchoolHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为业务冲突（重复提交、已锁定等），这类错误的消息可以原样返回给用户
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            SchoolHubError::ScoreLocked(_)
                | SchoolHubError::ScoresAlreadySubmitted(_)
                | SchoolHubError::ResultsAlreadySubmitted(_)
                | SchoolHubError::InvalidTransition(_)
        )
    }
}

impl fmt::Display for SchoolHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolHubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolHubError {
    fn from(err: serde_json::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for SchoolHubError {
    fn from(err: csv::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolHubError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolHubError::database_config("test").code(), "E003");
        assert_eq!(SchoolHubError::validation("test").code(), "E007");
        assert_eq!(SchoolHubError::score_locked("test").code(), "E102");
        assert_eq!(
            SchoolHubError::results_already_submitted("test").code(),
            "E105"
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolHubError::score_out_of_range("test").error_type(),
            "Score Out Of Range"
        );
        assert_eq!(
            SchoolHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_conflict_classification() {
        assert!(SchoolHubError::score_locked("x").is_conflict());
        assert!(SchoolHubError::results_already_submitted("x").is_conflict());
        assert!(!SchoolHubError::database_operation("x").is_conflict());
        assert!(!SchoolHubError::validation("x").is_conflict());
        assert!(!SchoolHubError::already_exists("x").is_conflict());
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolHubError::score_out_of_range("ca1 must be between 0 and 20");
        let formatted = err.format_simple();
        assert!(formatted.contains("Score Out Of Range"));
        assert!(formatted.contains("ca1 must be between 0 and 20"));
    }
}
