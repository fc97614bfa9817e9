//! Argon2id 密码哈希

use crate::config::{AppConfig, Argon2Config};
use crate::errors::SchoolDeskError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn configured_params(config: &Argon2Config) -> Result<Params, SchoolDeskError> {
    Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
        .map_err(|e| SchoolDeskError::validation(format!("Argon2 参数错误: {e}")))
}

pub fn hash_password(password: &str) -> Result<String, SchoolDeskError> {
    let params = configured_params(&AppConfig::get().argon2)?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SchoolDeskError::validation(format!("密码哈希失败: {e}")))
}

/// 参数取自哈希串本身，配置变更后旧哈希仍可校验
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// 哈希不是 Argon2id 或代价参数与配置不同
pub fn needs_rehash(hash: &str, config: &Argon2Config) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return true;
    };
    if parsed.algorithm != Algorithm::Argon2id.ident() {
        return true;
    }
    match Params::try_from(&parsed) {
        Ok(params) => {
            params.m_cost() != config.memory_cost
                || params.t_cost() != config.time_cost
                || params.p_cost() != config.parallelism
        }
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Config {
        Argon2Config {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn hash_with(config: &Argon2Config, password: &str) -> String {
        let params = configured_params(config).unwrap();
        let salt = SaltString::generate(&mut OsRng);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let hash = hash_with(&cheap(), "Secret#2025");
        assert!(verify_password("Secret#2025", &hash));
        assert!(!verify_password("secret#2025", &hash));
        assert!(!verify_password("Secret#2025", "not-a-hash"));
    }

    #[test]
    fn test_needs_rehash_when_cost_changes() {
        let config = cheap();
        let hash = hash_with(&config, "pw");
        assert!(!needs_rehash(&hash, &config));

        let stronger = Argon2Config {
            time_cost: 2,
            ..config
        };
        assert!(needs_rehash(&hash, &stronger));
        assert!(needs_rehash("plain", &stronger));
    }
}
