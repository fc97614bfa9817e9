use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

#[derive(Clone)]
struct Entry {
    raw: String,
    ttl: Duration,
}

/// 每条记录按写入时给定的 TTL 过期
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaObjectCache {
    fn with_limits(max_capacity: u64, default_ttl_secs: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    pub fn new() -> Result<Self, String> {
        let config = &AppConfig::get().cache;
        debug!(
            "In-memory cache: capacity {}, default TTL {}s",
            config.memory.max_capacity, config.default_ttl
        );
        Ok(Self::with_limits(config.memory.max_capacity, config.default_ttl))
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.raw),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { raw: value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::with_limits(16, 60);
        assert_eq!(cache.get_raw("auth:user:3").await, CacheResult::NotFound);
        cache.insert_raw("auth:user:3".into(), "{}".into(), 0).await;
        assert_eq!(
            cache.get_raw("auth:user:3").await,
            CacheResult::Found("{}".to_string())
        );
        cache.remove("auth:user:3").await;
        assert_eq!(cache.get_raw("auth:user:3").await, CacheResult::NotFound);
    }

    #[actix_web::test]
    async fn test_entry_expires_after_its_own_ttl() {
        let cache = MokaObjectCache::with_limits(16, 3600);
        cache.insert_raw("short".into(), "1".into(), 1).await;
        cache.insert_raw("long".into(), "2".into(), 0).await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
        assert_eq!(cache.get_raw("long").await, CacheResult::Found("2".to_string()));
    }

    #[actix_web::test]
    async fn test_json_helpers_through_trait_object() {
        let cache: Box<dyn ObjectCache> = Box::new(MokaObjectCache::with_limits(16, 60));
        cache.insert_json("n".into(), &vec![1, 2, 3], 0).await;
        assert_eq!(cache.get_json::<Vec<i32>>("n").await, Some(vec![1, 2, 3]));
        cache.insert_raw("bad".into(), "not json".into(), 0).await;
        assert_eq!(cache.get_json::<Vec<i32>>("bad").await, None);
        assert_eq!(cache.get_raw("bad").await, CacheResult::NotFound);
    }
}
