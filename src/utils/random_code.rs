use rand::Rng;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn pick(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

/// 生成指定位数的数字密钥（首位不为 0）
pub fn generate_numeric_key(digits: u32) -> String {
    let digits = digits.max(1);
    let low = 10u64.pow(digits - 1);
    let high = 10u64.pow(digits);
    rand::rng().random_range(low..high).to_string()
}

/// 生成随机密码
pub fn generate_random_password(length: usize) -> String {
    pick(PASSWORD_CHARSET, length)
}

/// 收据编号：RCP-YYYYMMDD-XXXXXX
pub fn generate_receipt_number(date: chrono::NaiveDate) -> String {
    format!("RCP-{}-{}", date.format("%Y%m%d"), pick(UPPER_ALNUM, 6))
}

/// 在线支付流水号：TXN-YYYYMMDD-XXXXXXXX
pub fn generate_transaction_id(date: chrono::NaiveDate) -> String {
    format!("TXN-{}-{}", date.format("%Y%m%d"), pick(UPPER_ALNUM, 8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_key_length() {
        for _ in 0..50 {
            let key = generate_numeric_key(6);
            assert_eq!(key.len(), 6);
            assert!(key.chars().all(|c| c.is_ascii_digit()));
            assert!(!key.starts_with('0'));
        }
        assert_eq!(generate_numeric_key(5).len(), 5);
    }

    #[test]
    fn test_receipt_and_transaction_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let receipt = generate_receipt_number(date);
        assert!(receipt.starts_with("RCP-20250309-"));
        assert_eq!(receipt.len(), "RCP-20250309-".len() + 6);

        let txn = generate_transaction_id(date);
        assert!(txn.starts_with("TXN-20250309-"));
        assert_eq!(txn.len(), "TXN-20250309-".len() + 8);
    }

    #[test]
    fn test_random_password_length() {
        assert_eq!(generate_random_password(16).len(), 16);
    }
}
