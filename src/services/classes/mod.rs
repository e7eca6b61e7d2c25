pub mod create;
pub mod list;
pub mod students;
pub mod subjects;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::context::SchoolContext;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::subjects::requests::{ClassSubjectsQuery, CreateSubjectAssignmentRequest};

pub use create::create_class;
pub use list::list_classes;
pub use students::{add_student, list_students};
pub use subjects::{create_subject_assignment, list_subjects};

pub struct ClassService {
    context: Option<SchoolContext>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { context: None }
    }

    pub(crate) fn get_context(&self, request: &HttpRequest) -> ActixResult<SchoolContext> {
        match &self.context {
            Some(context) => Ok(context.clone()),
            None => super::context_from_request(request),
        }
    }

    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_class(self, request, class_data).await
    }

    // 班级在读学生
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::handle_list_students(self, request, class_id).await
    }

    pub async fn add_student(
        &self,
        request: &HttpRequest,
        class_id: i64,
        student: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        students::handle_add_student(self, request, class_id, student).await
    }

    // 班级某学期的科目分配
    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: ClassSubjectsQuery,
    ) -> ActixResult<HttpResponse> {
        subjects::handle_list_subjects(self, request, class_id, query).await
    }

    pub async fn create_subject_assignment(
        &self,
        request: &HttpRequest,
        assignment: CreateSubjectAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::handle_create_assignment(self, request, assignment).await
    }
}
