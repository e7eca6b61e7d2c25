pub mod auth;

pub mod users;

pub mod classes;

pub mod scores;

pub mod results;

pub mod domains;

pub mod notifications;

pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use domains::configure_domain_routes;
pub use notifications::configure_notification_routes;
pub use results::configure_result_routes;
pub use scores::configure_score_routes;
pub use users::configure_user_routes;
