//! 账号与注册相关的输入校验

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").ok());

static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 -]{5,18}[0-9]$").ok());

/// 家长注册密钥位数
pub const PARENT_SECRET_KEY_LEN: usize = 6;
/// 教师注册密钥位数
pub const TEACHER_SECRET_KEY_LEN: usize = 5;

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 5..=16;
const MIN_PASSWORD_LEN: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "school123",
    "welcome1",
];

/// 5 到 16 位，仅字母、数字、下划线、连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !USERNAME_LEN.contains(&username.len()) {
        return Err("Username length must be between 5 and 16 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email)) {
        Ok(())
    } else {
        Err("Email format is invalid")
    }
}

/// 允许前导 + 以及空格、连字符分隔
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if PHONE_RE.as_ref().is_some_and(|re| re.is_match(phone)) {
        Ok(())
    } else {
        Err("Phone number format is invalid")
    }
}

/// 必须为指定位数的纯数字
pub fn validate_secret_key(key: &str, digits: usize) -> Result<(), String> {
    let key = key.trim();
    if key.len() != digits || !key.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Secret key must be exactly {digits} digits"));
    }
    Ok(())
}

/// 返回全部未满足的规则
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let checks: [(bool, &'static str); 4] = [
        (
            password.chars().count() >= MIN_PASSWORD_LEN,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
    ];
    let mut violations: Vec<&'static str> = checks
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, message)| message)
        .collect();

    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        violations.push("Password is too common, please choose a stronger password");
    }
    violations
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let violations = password_violations(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_format() {
        assert!(validate_secret_key("123456", PARENT_SECRET_KEY_LEN).is_ok());
        assert!(validate_secret_key(" 12345 ", TEACHER_SECRET_KEY_LEN).is_ok());
        assert!(validate_secret_key("12345", PARENT_SECRET_KEY_LEN).is_err());
        assert!(validate_secret_key("12a45", TEACHER_SECRET_KEY_LEN).is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("t_kumar-01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("bad name!").is_err());
    }

    #[test]
    fn test_email_and_phone() {
        assert!(validate_email("office@school.edu").is_ok());
        assert!(validate_email("office@school").is_err());
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password_simple("SecureP@ss1").is_ok());
        assert!(validate_password_simple("SecurePass123").is_ok());

        let short = password_violations("Ab1");
        assert_eq!(short, vec!["Password must be at least 8 characters long"]);

        let lower_only = password_violations("abcdefgh");
        assert!(lower_only.contains(&"Password must contain at least one uppercase letter"));
        assert!(lower_only.contains(&"Password must contain at least one digit"));

        assert!(
            password_violations("Password1")
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
