use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    /// 首次使用时建立，之后复用
    connection: OnceCell<MultiplexedConnection>,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    /// 构造时 PING 一次，失败则交给上层回退到内存缓存
    pub fn new() -> Result<Self, String> {
        let config = &AppConfig::get().cache;
        let url = &config.redis.url;
        let client =
            redis::Client::open(url.as_str()).map_err(|e| format!("Invalid Redis URL {url}: {e}"))?;

        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis at {url} unreachable: {e}"))?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        info!("Redis cache connected, key prefix '{}'", config.redis.key_prefix);

        Ok(Self {
            client,
            connection: OnceCell::new(),
            key_prefix: config.redis.key_prefix.clone(),
            default_ttl: config.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        self.connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await
            .map_err(|e| error!("Failed to get Redis connection: {}", e))
            .ok()
            .cloned()
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };
        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(Some(raw)) => CacheResult::Found(raw),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Redis GET {} failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn.set_ex::<_, _, ()>(self.key(&key), value, ttl).await {
            error!("Redis SETEX {} failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, i64>(self.key(key)).await {
            error!("Redis DEL {} failed: {}", key, e);
        }
    }
}
