/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <JWT_TOKEN>` 中的访问令牌，解析出当前用户
 * （ID、角色、关联学生 ID）并写入请求扩展，供后续中间件与处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/scores")
 *         .wrap(RequireJWT)
 *         .route("/sheet", web::get().to(score_sheet)),
 * );
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_user_claims(&req)` 读取当前用户。
 *
 * ## 认证流程
 *
 * 1. 提取并校验令牌签名与过期时间
 * 2. 以 `user:{token}` 为键查询缓存中的用户
 * 3. 缓存未命中时从存储层读取，仅允许状态为 active 的用户
 * 4. 令牌无效或缺失时返回 401
 */

use crate::cache::CacheResult;
use crate::context::SchoolContext;
use crate::models::ErrorCode;
use crate::models::users::entities;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{StatusCode, header},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因，消息会随 401 响应返回
#[derive(Debug, PartialEq, Eq)]
enum AuthRejection {
    MissingToken,
    InvalidToken,
    ContextMissing,
    StorageUnavailable,
    UnknownUser,
    Inactive,
    StaleRole,
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            AuthRejection::MissingToken => "Missing or invalid Authorization header",
            AuthRejection::InvalidToken => "Invalid or expired token",
            AuthRejection::ContextMissing => "Application context not configured",
            AuthRejection::StorageUnavailable => "Failed to load user",
            AuthRejection::UnknownUser => "User not found",
            AuthRejection::Inactive => "User is not active",
            AuthRejection::StaleRole => "Token role is out of date",
        };
        f.write_str(msg)
    }
}

fn bearer_token(header: Option<&str>) -> Result<&str, AuthRejection> {
    header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthRejection::MissingToken)
}

async fn cached_user(context: &SchoolContext, cache_key: &str) -> Option<entities::User> {
    let cache = context.cache();
    match cache.get_raw(cache_key).await {
        CacheResult::Found(json) => match serde_json::from_str::<entities::User>(&json) {
            Ok(user) => Some(user),
            Err(_) => {
                info!("缓存中的用户数据无法解析，已移除");
                cache.remove(cache_key).await;
                None
            }
        },
        _ => None,
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<entities::User, AuthRejection> {
    let token = bearer_token(
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok()),
    )?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT 校验失败: {}", err);
        AuthRejection::InvalidToken
    })?;

    let context = req
        .app_data::<web::Data<SchoolContext>>()
        .ok_or(AuthRejection::ContextMissing)?
        .get_ref()
        .clone();
    let cache_key = format!("user:{token}");

    if let Some(user) = cached_user(&context, &cache_key).await {
        return Ok(user);
    }

    let user_id = claims.user_id().ok_or(AuthRejection::InvalidToken)?;
    let user = context
        .storage()
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("认证时读取用户 {} 失败: {}", user_id, e);
            AuthRejection::StorageUnavailable
        })?
        .ok_or(AuthRejection::UnknownUser)?;

    if !user.is_active() {
        return Err(AuthRejection::Inactive);
    }
    // 角色被调整过的账号必须重新登录
    if claims.user_role() != Some(user.role) {
        return Err(AuthRejection::StaleRole);
    }

    if let Ok(json) = serde_json::to_string(&user) {
        context
            .cache()
            .insert_raw(cache_key, json, context.ttl())
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("用户 {} 通过认证", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!("{} 认证失败: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前请求的用户，仅在 RequireJWT 之后可用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(
            bearer_token(Some("Basic abc")),
            Err(AuthRejection::MissingToken)
        );
        assert_eq!(bearer_token(Some("Bearer   ")), Err(AuthRejection::MissingToken));
        assert_eq!(bearer_token(None), Err(AuthRejection::MissingToken));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(AuthRejection::Inactive.to_string(), "User is not active");
        assert_eq!(
            AuthRejection::InvalidToken.to_string(),
            "Invalid or expired token"
        );
    }
}
