use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, SchoolHubError> {
    let config = AppConfig::get();
    hash_password_with_params(
        password,
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
    )
}

/// 使用指定 Argon2 参数哈希密码
pub fn hash_password_with_params(
    password: &str,
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
) -> Result<String, SchoolHubError> {
    let params = Params::new(memory_cost, time_cost, parallelism, None)
        .map_err(|e| SchoolHubError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SchoolHubError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with_params("Teach3rPass", 8 * 1024, 1, 1).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Teach3rPass", &hash));
        assert!(!verify_password("teach3rpass", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_verification() {
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
