use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::classes::requests::ClassQueryParams;
use crate::models::classes::responses::ClassListResponse;
use crate::services::error_response;

/// 分页列出班级，search 为空白时视为不过滤
pub async fn list_classes(
    context: &SchoolContext,
    mut query: ClassQueryParams,
) -> Result<ClassListResponse> {
    if query.pagination.page < 1 || query.pagination.size < 1 {
        return Err(SchoolHubError::validation("page and size must be positive"));
    }
    query.search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    context.storage().list_classes_with_pagination(query).await
}

pub async fn handle_list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let context = service.get_context(request)?;

    match list_classes(&context, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve class list")),
    }
}
