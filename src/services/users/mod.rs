pub mod create;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::context::SchoolContext;
use crate::models::users::requests::CreateUserRequest;

pub use create::create_user;

pub struct UserService {
    context: Option<SchoolContext>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    // 创建用户
    pub async fn create_user(
        &self,
        request: &HttpRequest,
        user_data: CreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_user(self, request, user_data).await
    }
}
