pub mod permissions;
pub mod requests;
pub mod responses;

pub use permissions::Permission;
pub use requests::LoginRequest;
pub use responses::{LoginResponse, UserInfoResponse};
