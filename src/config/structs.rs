use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub argon2: Argon2Config,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub leave_approval: LeaveApprovalConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub refresh_token_remember_me_expiry: i64,
}

/// Argon2 密码哈希参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

/// 请求安全层配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// 完全关闭全局限流（对应 DISABLE_RATE_LIMITING）
    pub disable_rate_limiting: bool,
    pub rate_limit: RateLimitProfiles,
    /// 可疑 User-Agent 片段，大小写不敏感
    pub blocked_user_agents: Vec<String>,
    pub max_url_length: usize,
    pub max_body_size: u64,
    pub force_hsts: bool,
    pub content_security_policy: String,
    /// 前缀匹配的豁免路径
    pub exempt_prefixes: Vec<String>,
    /// 精确匹配的豁免路径
    pub exempt_paths: Vec<String>,
    /// 空闲限流记录清理间隔 (秒)
    pub purge_interval: u64,
}

/// 限流阈值（按环境区分）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitProfiles {
    pub development: RateLimitThresholds,
    pub production: RateLimitThresholds,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitThresholds {
    pub requests_per_minute: u32,
    pub requests_per_hour: u32,
}

/// 请假自动审批后台任务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveApprovalConfig {
    pub monitor_enabled: bool,
    /// 检查间隔 (秒)
    pub check_interval: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            disable_rate_limiting: false,
            rate_limit: RateLimitProfiles::default(),
            blocked_user_agents: [
                "sqlmap",
                "nmap",
                "masscan",
                "dirbuster",
                "gobuster",
                "nikto",
                "acunetix",
                "openvas",
                "nessus",
                "qualys",
                "burp",
                "owasp",
                "metasploit",
                "wpscan",
                "joomlavs",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_url_length: 2048,
            max_body_size: 10 * 1024 * 1024,
            force_hsts: true,
            content_security_policy: "default-src 'self'; script-src 'self'; \
                style-src 'self' 'unsafe-inline'; img-src 'self' data:; \
                font-src 'self' data:; connect-src 'self'; frame-ancestors 'none'; \
                base-uri 'self'; form-action 'self'"
                .to_string(),
            exempt_prefixes: vec!["/static/".to_string()],
            exempt_paths: vec!["/health".to_string()],
            purge_interval: 300,
        }
    }
}

impl Default for RateLimitProfiles {
    fn default() -> Self {
        Self {
            development: RateLimitThresholds {
                requests_per_minute: 1000,
                requests_per_hour: 50000,
            },
            production: RateLimitThresholds {
                requests_per_minute: 300,
                requests_per_hour: 10000,
            },
        }
    }
}

impl Default for RateLimitThresholds {
    fn default() -> Self {
        RateLimitProfiles::default().production
    }
}

impl Default for LeaveApprovalConfig {
    fn default() -> Self {
        Self {
            monitor_enabled: true,
            check_interval: 60,
        }
    }
}
