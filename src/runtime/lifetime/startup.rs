use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FALLBACK_CACHE: &str = "moka";
const DEFAULT_ADMIN_EMAIL: &str = "admin@school.local";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 依次尝试的缓存后端：配置项在前，内存缓存兜底
pub fn cache_candidates(configured: &str) -> Vec<&str> {
    if configured == FALLBACK_CACHE {
        vec![FALLBACK_CACHE]
    } else {
        vec![configured, FALLBACK_CACHE]
    }
}

async fn create_cache(cache_type: &str) -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    for candidate in cache_candidates(cache_type) {
        let Some(constructor) = get_object_cache_plugin(candidate) else {
            warn!("Cache backend '{}' is not registered", candidate);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if candidate != cache_type {
                    warn!("Using {} cache instead of {}", candidate, cache_type);
                }
                info!("{} cache backend ready", candidate);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", candidate, e),
        }
    }
    Err(format!("No cache backend available (configured: {cache_type})").into())
}

/// 空库时创建管理员；密码取 ADMIN_PASSWORD，未设置则随机生成并打印一次
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("User table is empty, seeding administrator account"),
        Ok(count) => {
            debug!("{} user(s) present, admin seed skipped", count);
            return;
        }
        Err(e) => {
            warn!("Could not count users, admin seed skipped: {}", e);
            return;
        }
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            let generated = generate_random_password(16);
            warn!("ADMIN_PASSWORD is not set; generated administrator password: {generated}");
            warn!("This password is shown only once. Change it after the first login.");
            generated
        }
    };
    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Could not hash administrator password, admin seed skipped: {}", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: "admin".to_string(),
        email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("School Administrator".to_string()),
        phone: None,
    };
    match storage.create_user(admin).await {
        Ok(user) => info!("Administrator '{}' created (id {})", user.username, user.id),
        Err(e) => warn!("Failed to create administrator account: {}", e),
    }
}

/// 存储、初始管理员与缓存
pub async fn prepare_server_startup() -> Result<StartupContext, Box<dyn std::error::Error>> {
    // 重复安装返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    info!("Storage ready, migrations applied");

    seed_admin(&storage).await;

    let cache = create_cache(&AppConfig::get().cache.cache_type).await?;

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_candidates_end_with_memory_cache() {
        assert_eq!(cache_candidates("redis"), vec!["redis", "moka"]);
        assert_eq!(cache_candidates("moka"), vec!["moka"]);
        assert_eq!(cache_candidates("memcached"), vec!["memcached", "moka"]);
    }
}
