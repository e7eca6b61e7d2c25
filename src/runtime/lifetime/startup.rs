use crate::cache::{
    ObjectCache,
    register::{get_object_cache_plugin, registered_object_cache_plugins},
};
use crate::config::AppConfig;
use crate::context::SchoolContext;
use crate::errors::{Result, SchoolHubError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FALLBACK_CACHE: &str = "moka";
const SEED_ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub context: SchoolContext,
}

/// 按配置的后端创建缓存，失败时退回内存缓存
async fn create_cache(cache_type: &str) -> Result<Arc<dyn ObjectCache>> {
    debug!("已注册的缓存后端: {:?}", registered_object_cache_plugins());

    let mut candidates = vec![cache_type];
    if cache_type != FALLBACK_CACHE {
        candidates.push(FALLBACK_CACHE);
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("缓存后端 '{}' 未注册", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if name != cache_type {
                    warn!("缓存后端 '{}' 不可用，已改用 '{}'", cache_type, name);
                }
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("创建缓存后端 '{}' 失败: {}", name, e),
        }
    }

    Err(SchoolHubError::cache_plugin_not_found(format!(
        "No cache backend available (configured: {cache_type})"
    )))
}

/// 生成满足密码策略的随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    loop {
        let candidate: String = (0..length)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();
        if validate_password(&candidate).is_ok() {
            return candidate;
        }
    }
}

/// 空库时创建管理员账号，密码取自 ADMIN_PASSWORD 或随机生成
async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let existing = storage.count_users().await?;
    if existing > 0 {
        debug!("已有 {} 个账号，跳过管理员初始化", existing);
        return Ok(());
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) => {
            if let Err(reason) = validate_password(&password) {
                warn!("ADMIN_PASSWORD 不符合密码策略: {}", reason);
            }
            password
        }
        Err(_) => {
            let generated = generate_random_password(16);
            warn!("ADMIN_PASSWORD is not set, generated admin password: {}", generated);
            warn!("Store it now or set ADMIN_PASSWORD before the next start");
            generated
        }
    };

    let admin = storage
        .create_user(CreateUserRequest {
            username: SEED_ADMIN_USERNAME.to_string(),
            email: "admin@localhost".to_string(),
            password: hash_password(&password)?,
            role: UserRole::Admin,
            display_name: Some("Administrator".to_string()),
            linked_id: None,
        })
        .await?;

    info!("管理员账号已创建 (ID: {}, 用户名: {})", admin.id, admin.username);
    Ok(())
}

/// 连接存储、初始化管理员并创建缓存，得到请求共享的上下文
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    info!("存储后端已就绪");

    if let Err(e) = seed_admin(&storage).await {
        warn!("管理员账号初始化失败: {}", e);
    }

    let cache = create_cache(&config.cache.cache_type)
        .await
        .expect("Failed to create cache");

    let context = SchoolContext::new(storage, cache, config.cache.default_ttl);
    info!("{} is ready", config.school.name);

    StartupContext { context }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_random_password(16);
            assert_eq!(password.chars().count(), 16);
            assert!(validate_password(&password).is_ok());
        }
    }
}
