/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 生成资源 ID (UUID v4)
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Keep only ASCII digits ("010-1234-5678" → "01012345678")
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mobile numbers are 10 or 11 digits once normalized
pub fn is_valid_phone(digits: &str) -> bool {
    (10..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
