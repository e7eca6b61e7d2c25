pub mod compile;
pub mod list;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::context::SchoolContext;
use crate::models::common::ClassSessionQuery;
use crate::models::results::requests::{
    ApproveResultsRequest, CompileResultsRequest, RejectResultsRequest,
};

pub use compile::{CompileOutcome, compile_results, preview_results};
pub use list::{list_results, student_results};
pub use review::{approve_results, reject_results};

pub struct ResultService {
    context: Option<SchoolContext>,
}

impl ResultService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    // 预览（不写入）
    pub async fn preview(
        &self,
        request: &HttpRequest,
        query: ClassSessionQuery,
    ) -> ActixResult<HttpResponse> {
        compile::handle_preview(self, request, query).await
    }

    // 汇总并提交审核
    pub async fn compile(
        &self,
        request: &HttpRequest,
        compile: CompileResultsRequest,
    ) -> ActixResult<HttpResponse> {
        compile::handle_compile(self, request, compile).await
    }

    // 审核通过
    pub async fn approve(
        &self,
        request: &HttpRequest,
        approve: ApproveResultsRequest,
    ) -> ActixResult<HttpResponse> {
        review::handle_approve(self, request, approve).await
    }

    // 驳回
    pub async fn reject(
        &self,
        request: &HttpRequest,
        reject: RejectResultsRequest,
    ) -> ActixResult<HttpResponse> {
        review::handle_reject(self, request, reject).await
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        query: ClassSessionQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list(self, request, query).await
    }

    pub async fn student_results(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::handle_student_results(self, request, student_id).await
    }
}
