pub mod ratings;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::context::SchoolContext;
use crate::models::common::ClassSessionQuery;
use crate::models::domains::requests::{AffectiveRatingRequest, PsychomotorRatingRequest};

pub use ratings::{list_domains, rate_affective, rate_psychomotor};

pub struct DomainService {
    context: Option<SchoolContext>,
}

impl DomainService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    pub async fn rate_affective(
        &self,
        request: &HttpRequest,
        rating: AffectiveRatingRequest,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_rate_affective(self, request, rating).await
    }

    pub async fn rate_psychomotor(
        &self,
        request: &HttpRequest,
        rating: PsychomotorRatingRequest,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_rate_psychomotor(self, request, rating).await
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        query: ClassSessionQuery,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_list(self, request, query).await
    }
}
