pub mod pagination;
pub mod response;
pub mod session;

pub use pagination::{PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use session::{AcademicSession, ClassSessionQuery, Term};
