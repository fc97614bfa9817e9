/// 金额保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 金额是否可视为零
pub fn is_zero(value: f64) -> bool {
    value.abs() < 0.005
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.005_1), 10.01);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(-2.499), -2.5);
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.004));
        assert!(!is_zero(0.01));
    }
}
