use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// `page` 从 1 开始，`size` 默认 10
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// 页码既可能是 JSON 数字，也可能是查询串里的字符串
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{s}'"))),
    }
}

/// 查询串中的可选整数（flatten 后值均以字符串形式出现）
pub fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// 查询串中的可选布尔值，接受 true/false/1/0
pub fn deserialize_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(v) => Err(serde::de::Error::custom(format!("invalid boolean: {v}"))),
    }
}

impl PaginationQuery {
    /// 页码与每页数量归一化到合法范围
    pub fn normalized(&self) -> (u64, u64) {
        (self.page.max(1) as u64, self.size.clamp(1, 100) as u64)
    }
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_opt_i64")]
        class_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_opt_bool")]
        active: Option<bool>,
    }

    #[test]
    fn test_flattened_query_parsing() {
        let p = actix_web::web::Query::<Params>::from_query("page=2&size=5&class_id=7&active=1")
            .unwrap()
            .into_inner();
        assert_eq!(p.pagination.page, 2);
        assert_eq!(p.pagination.size, 5);
        assert_eq!(p.class_id, Some(7));
        assert_eq!(p.active, Some(true));
    }

    #[test]
    fn test_missing_optional_fields() {
        let p = actix_web::web::Query::<Params>::from_query("class_id=")
            .unwrap()
            .into_inner();
        assert_eq!(p.pagination.page, 1);
        assert_eq!(p.class_id, None);
        assert_eq!(p.active, None);
    }

    #[test]
    fn test_normalized_clamps() {
        let q = PaginationQuery { page: 0, size: 500 };
        assert_eq!(q.normalized(), (1, 100));
    }

    #[test]
    fn test_page_accepts_json_numbers() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page": 3, "size": "20"}"#).unwrap();
        assert_eq!((q.page, q.size), (3, 20));
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "x"}"#).is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 10, 21).total_pages, 3);
    }
}
