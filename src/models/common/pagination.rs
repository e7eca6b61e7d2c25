use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 单页最大条数
pub const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数，page/size 允许以字符串形式出现在 query string 中
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl PaginationQuery {
    /// 归一化后的 (page, size)，page 从 1 开始
    pub fn clamped(&self) -> (u64, u64) {
        (
            self.page.max(1) as u64,
            self.size.clamp(1, MAX_PAGE_SIZE) as u64,
        )
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {text}"))),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_bounds() {
        let query = PaginationQuery { page: 0, size: 500 };
        assert_eq!(query.clamped(), (1, MAX_PAGE_SIZE as u64));

        let query = PaginationQuery { page: 3, size: 0 };
        assert_eq!(query.clamped(), (3, 1));
    }

    #[test]
    fn test_string_numbers_accepted() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page":"2","size":" 15 "}"#).unwrap();
        assert_eq!((query.page, query.size), (2, 15));

        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((query.page, query.size), (1, 20));

        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page":"two"}"#).is_err());
    }
}
