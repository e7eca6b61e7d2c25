//! 路径参数安全提取器
//!
//! 解析失败时直接返回统一的 JSON 错误响应，而不是 actix 默认的纯文本 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! define_safe_i64_path {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_i64(req, $param).map($name))
            }
        }
    };
}

define_safe_i64_path!(SafeClassIdI64, "class_id");
define_safe_i64_path!(SafeStudentIdI64, "student_id");

fn parse_positive_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(param)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter: {param}"),
            ));
            InternalError::from_response(format!("invalid {param}"), response).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_positive_id() {
        let req = TestRequest::default()
            .param("class_id", "42")
            .to_http_request();
        let id = SafeClassIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_rejects_invalid_id() {
        let req = TestRequest::default()
            .param("student_id", "abc")
            .to_http_request();
        assert!(SafeStudentIdI64::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("student_id", "-3")
            .to_http_request();
        assert!(SafeStudentIdI64::extract(&req).await.is_err());
    }
}
