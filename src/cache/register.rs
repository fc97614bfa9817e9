//! 缓存后端注册表
//!
//! 各后端在进程启动时经 `declare_object_cache_plugin!` 写入，启动流程按名称取出构造器。

use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

/// 按名称排序，便于日志输出
static BACKENDS: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    BACKENDS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

pub fn registered_object_cache_plugins() -> Vec<String> {
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

pub fn debug_object_cache_registry() {
    tracing::debug!(
        "Cache backends available: [{}]",
        registered_object_cache_plugins().join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        assert_eq!(registered_object_cache_plugins(), vec!["moka", "redis"]);
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
