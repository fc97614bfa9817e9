use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::sync::OnceLock;

use super::{AppConfig, RateLimitThresholds};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

const PLACEHOLDER_JWT_SECRET: &str = "change-me-in-production";
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// 部署时常用的环境变量 → 配置键
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("REDIS_TTL", "cache.default_ttl"),
    ("DISABLE_RATE_LIMITING", "security.disable_rate_limiting"),
    ("FORCE_HSTS", "security.force_hsts"),
];

fn apply_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(*key, std::env::var(var).ok())?;
    }
    Ok(builder)
}

impl AppConfig {
    /// config.toml → config.{APP_ENV}.toml → SCHOOLDESK_* → 常用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("SCHOOLDESK")
                    .separator("_")
                    .try_parsing(true),
            );

        let mut app_config: AppConfig = apply_env_overrides(builder)?.build()?.try_deserialize()?;
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }
        app_config.validate()?;
        Ok(app_config)
    }

    /// 拒绝无法安全运行的组合
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.jwt.secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.is_production()
            && (secret == PLACEHOLDER_JWT_SECRET || secret.len() < MIN_PRODUCTION_SECRET_LEN)
        {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be replaced with at least {MIN_PRODUCTION_SECRET_LEN} characters in production"
            )));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::Message("jwt expiry values must be positive".into()));
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

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 当前环境对应的全局限流阈值，关闭限流时返回 None
    pub fn rate_limit_thresholds(&self) -> Option<RateLimitThresholds> {
        if self.security.disable_rate_limiting {
            None
        } else if self.is_development() {
            Some(self.security.rate_limit.development)
        } else {
            Some(self.security.rate_limit.production)
        }
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../../config.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_bundled_config_is_valid_for_development() {
        let config = base();
        assert!(config.is_development());
        assert!(config.validate().is_ok());
        assert!(config.rate_limit_thresholds().is_some());
    }

    #[test]
    fn test_production_rejects_placeholder_secret() {
        let mut config = base();
        config.app.environment = "production".into();
        assert!(config.validate().is_err());

        config.jwt.secret = "x".repeat(MIN_PRODUCTION_SECRET_LEN);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.rate_limit_thresholds(),
            Some(config.security.rate_limit.production)
        );
    }

    #[test]
    fn test_disabled_rate_limiting_has_no_thresholds() {
        let mut config = base();
        config.security.disable_rate_limiting = true;
        assert!(config.rate_limit_thresholds().is_none());
    }
}
