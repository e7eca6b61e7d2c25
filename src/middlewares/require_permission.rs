/*!
 * 基于权限的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。角色到权限的映射是静态表
 * （见 `models::auth::permissions`），路由只声明所需权限。
 *
 * ```rust,ignore
 * use crate::middlewares::{RequireJWT, RequirePermission};
 * use crate::models::auth::Permission;
 *
 * web::scope("/api/v1/results")
 *     .wrap(RequireJWT)
 *     .route(
 *         "/approve",
 *         web::post()
 *             .to(approve_results)
 *             .wrap(RequirePermission::new(Permission::ApproveResults)),
 *     );
 * ```
 *
 * 或者任一权限即可：
 *
 * ```rust,ignore
 * .wrap(RequirePermission::new_any(&[Permission::ViewResults, Permission::ViewOwnChildResults]))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{ErrorCode, auth::Permission, users::entities};

use super::create_error_response;

#[derive(Clone)]
pub struct RequirePermission {
    required: Vec<Permission>,
    require_all: bool, // true表示需要全部权限，false表示任一权限即可
}

impl RequirePermission {
    /// 需要单一权限
    pub fn new(permission: Permission) -> Self {
        Self {
            required: vec![permission],
            require_all: true,
        }
    }

    /// 需要全部权限
    pub fn new_all(permissions: &[Permission]) -> Self {
        Self {
            required: permissions.to_vec(),
            require_all: true,
        }
    }

    /// 需要任一权限
    pub fn new_any(permissions: &[Permission]) -> Self {
        Self {
            required: permissions.to_vec(),
            require_all: false,
        }
    }

    fn is_satisfied_by(&self, user: &entities::User) -> bool {
        if self.require_all {
            self.required.iter().all(|p| user.role.has_permission(*p))
        } else {
            self.required.iter().any(|p| user.role.has_permission(*p))
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            guard: self.clone(),
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    guard: RequirePermission,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let guard = self.guard.clone();

        Box::pin(async move {
            let user = req.extensions().get::<entities::User>().cloned();

            match user {
                Some(user) => {
                    if guard.is_satisfied_by(&user) {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (role: {}). Required permissions: {:?}",
                            user.id, user.role, guard.required
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Access denied.",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Permission check failed: no user in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};

    fn user_with_role(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "someone".to_string(),
            email: "someone@school.ng".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            linked_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_single_permission_guard() {
        let guard = RequirePermission::new(Permission::ApproveResults);
        assert!(guard.is_satisfied_by(&user_with_role(UserRole::Admin)));
        assert!(!guard.is_satisfied_by(&user_with_role(UserRole::Teacher)));
    }

    #[test]
    fn test_any_permission_guard() {
        let guard =
            RequirePermission::new_any(&[Permission::ViewResults, Permission::ViewOwnChildResults]);
        assert!(guard.is_satisfied_by(&user_with_role(UserRole::Parent)));
        assert!(guard.is_satisfied_by(&user_with_role(UserRole::Teacher)));
        assert!(!guard.is_satisfied_by(&user_with_role(UserRole::Accountant)));
    }

    #[test]
    fn test_all_permissions_guard() {
        let guard =
            RequirePermission::new_all(&[Permission::EnterScores, Permission::UnlockScores]);
        assert!(guard.is_satisfied_by(&user_with_role(UserRole::Admin)));
        assert!(!guard.is_satisfied_by(&user_with_role(UserRole::Teacher)));
    }
}
