use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 按 config.toml → config.{APP_ENV}.toml → SCHOOLHUB_* 的顺序叠加
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("SCHOOLHUB")
                    .separator("_")
                    .try_parsing(true),
            )
            .set_override("app.environment", environment)?
            // 常见部署变量，不带前缀
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers).max(1);
        }
        app_config.validate()?;

        Ok(app_config)
    }

    /// 启动前的一致性检查
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT_SECRET)".to_string(),
            ));
        }
        if !self.is_development() && self.jwt.secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::Message(format!(
                "jwt.secret still has its default value in '{}' environment",
                self.app.environment
            )));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expiry must be positive (minutes)".to_string(),
            ));
        }
        if self.school.max_import_rows == 0 {
            return Err(ConfigError::Message(
                "school.max_import_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用一次
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> AppConfig {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../../config.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("bundled config.toml deserializes")
    }

    #[test]
    fn test_bundled_config_is_valid_for_development() {
        let config = bundled();
        assert!(config.is_development());
        assert!(config.validate().is_ok());
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_secret_rejected_outside_development() {
        let mut config = bundled();
        config.app.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let mut config = bundled();
        config.jwt.access_token_expiry = 0;
        assert!(config.validate().is_err());

        let mut config = bundled();
        config.school.max_import_rows = 0;
        assert!(config.validate().is_err());
    }
}
