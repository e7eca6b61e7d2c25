pub mod draft;
pub mod sheet;
pub mod submit;
pub mod transfer;
pub mod unlock;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::context::SchoolContext;
use crate::models::scores::requests::{SaveDraftRequest, SubmitScoresRequest, UnlockScoresRequest};

pub use draft::save_draft;
pub use sheet::load_score_sheet;
pub use submit::{ScoreSubmitOutcome, submit_scores};
pub use transfer::{export_score_sheet, import_score_rows};
pub use unlock::unlock_scores;

pub struct ScoreService {
    context: Option<SchoolContext>,
}

impl ScoreService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    // 获取成绩录入表
    pub async fn get_sheet(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        sheet::handle_get_sheet(self, request, assignment_id).await
    }

    // 保存草稿
    pub async fn save_draft(
        &self,
        request: &HttpRequest,
        draft: SaveDraftRequest,
    ) -> ActixResult<HttpResponse> {
        draft::handle_save_draft(self, request, draft).await
    }

    // 提交成绩
    pub async fn submit(
        &self,
        request: &HttpRequest,
        submit: SubmitScoresRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit(self, request, submit).await
    }

    // 退回草稿（管理员）
    pub async fn unlock(
        &self,
        request: &HttpRequest,
        unlock: UnlockScoresRequest,
    ) -> ActixResult<HttpResponse> {
        unlock::handle_unlock(self, request, unlock).await
    }

    // 导出 CSV
    pub async fn export(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        transfer::handle_export(self, request, assignment_id).await
    }

    // 导入 CSV
    pub async fn import(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        transfer::handle_import(self, request, assignment_id, payload).await
    }
}
