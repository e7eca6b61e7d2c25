pub mod login;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::context::SchoolContext;
use crate::models::auth::LoginRequest;

pub use login::login;

pub struct AuthService {
    context: Option<SchoolContext>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        request: &HttpRequest,
        login_request: LoginRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, request, login_request).await
    }

    // 当前用户信息及权限
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        login::handle_me(request).await
    }
}
