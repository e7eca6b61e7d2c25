pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::context::SchoolContext;
use crate::models::notifications::requests::NotificationListQuery;

pub use list::list_notifications;

pub struct NotificationService {
    context: Option<SchoolContext>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    // 当前角色可见的通知
    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        query: NotificationListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_notifications(self, request, query).await
    }
}
