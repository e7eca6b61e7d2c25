use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 用户角色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_id: Option<i64>, // 家长账号关联的学生 ID
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn user_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: UserRole,
        linked_id: Option<i64>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_secret(
            user_id,
            role,
            linked_id,
            &config.jwt.secret,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 使用指定密钥与过期时间签发 Token
    pub fn generate_token_with_secret(
        user_id: i64,
        role: UserRole,
        linked_id: Option<i64>,
        secret: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            linked_id,
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_with_secret(token, &AppConfig::get().jwt.secret)
    }

    pub fn verify_token_with_secret(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-for-unit-tests";

    #[test]
    fn test_token_carries_role_and_link() {
        let token = JwtUtils::generate_token_with_secret(
            7,
            UserRole::Parent,
            Some(42),
            SECRET,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::verify_token_with_secret(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.user_role(), Some(UserRole::Parent));
        assert_eq!(claims.linked_id, Some(42));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::generate_token_with_secret(
            1,
            UserRole::Admin,
            None,
            SECRET,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::verify_token_with_secret(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::generate_token_with_secret(
            1,
            UserRole::Teacher,
            None,
            SECRET,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_token_with_secret(&token, SECRET).is_err());
    }
}
