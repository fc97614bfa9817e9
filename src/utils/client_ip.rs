//! 客户端 IP 识别
//!
//! 两套规则：限流使用 [`resolve_client_ip`]（简单固定的头部顺序），
//! 活动日志使用 [`ClientIpInfo::resolve`]（多来源，优先公网/内网地址）。

use actix_web::http::header::HeaderMap;
use serde::Serialize;
use std::net::IpAddr;

const CF_CONNECTING_IP: &str = "CF-Connecting-IP";
const X_REAL_IP: &str = "X-Real-IP";
const X_ORIGINAL_FOR: &str = "X-Original-For";
const X_CLIENT_IP: &str = "X-Client-IP";
const X_CLUSTER_CLIENT_IP: &str = "X-Cluster-Client-IP";
const X_FORWARDED: &str = "X-Forwarded";
const X_FORWARDED_FOR: &str = "X-Forwarded-For";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_forwarded(value: &str) -> Option<String> {
    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 限流键：X-Real-IP → X-Client-IP → X-Forwarded-For 首个 → 对端地址 → "unknown"
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<&str>) -> String {
    header_value(headers, X_REAL_IP)
        .or_else(|| header_value(headers, X_CLIENT_IP))
        .or_else(|| header_value(headers, X_FORWARDED_FOR).and_then(|v| first_forwarded(&v)))
        .or_else(|| peer.map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IpType {
    Public,
    Private,
    Local,
    Unknown,
}

impl IpType {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().parse::<IpAddr>() {
            Ok(ip) => Self::of(ip),
            Err(_) => IpType::Unknown,
        }
    }

    pub fn of(ip: IpAddr) -> Self {
        if ip.is_loopback() {
            return IpType::Local;
        }
        match ip {
            IpAddr::V4(v4) => {
                if v4.is_private() || v4.is_link_local() || v4.is_unspecified() {
                    IpType::Private
                } else {
                    IpType::Public
                }
            }
            IpAddr::V6(v6) => {
                let first = v6.segments()[0];
                // fc00::/7 唯一本地地址，fe80::/10 链路本地地址
                if (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80 || v6.is_unspecified()
                {
                    IpType::Private
                } else {
                    IpType::Public
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IpType::Public => "public",
            IpType::Private => "private",
            IpType::Local => "local",
            IpType::Unknown => "unknown",
        }
    }
}

/// 活动日志所需的完整来源信息
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientIpInfo {
    pub primary_ip: Option<String>,
    pub ip_type: Option<IpType>,
    pub remote_addr: Option<String>,
    pub x_forwarded_for: Option<String>,
    pub x_real_ip: Option<String>,
    pub x_client_ip: Option<String>,
    /// 所有参与判定的转发头原始值
    pub all_headers: Vec<(&'static str, Option<String>)>,
}

impl ClientIpInfo {
    pub fn resolve(headers: &HeaderMap, peer: Option<&str>) -> Self {
        let candidates: Vec<(&'static str, Option<String>)> = vec![
            (CF_CONNECTING_IP, header_value(headers, CF_CONNECTING_IP)),
            (X_REAL_IP, header_value(headers, X_REAL_IP)),
            (X_ORIGINAL_FOR, header_value(headers, X_ORIGINAL_FOR)),
            (X_CLIENT_IP, header_value(headers, X_CLIENT_IP)),
            (X_CLUSTER_CLIENT_IP, header_value(headers, X_CLUSTER_CLIENT_IP)),
            (X_FORWARDED, header_value(headers, X_FORWARDED)),
            (X_FORWARDED_FOR, header_value(headers, X_FORWARDED_FOR)),
            ("Remote-Addr", peer.map(str::to_string)),
        ];

        let mut primary: Option<(String, IpType)> = None;
        for (name, value) in &candidates {
            let Some(value) = value else { continue };
            let candidate = if *name == X_FORWARDED_FOR {
                match first_forwarded(value) {
                    Some(first) => first,
                    None => continue,
                }
            } else {
                value.clone()
            };
            let Ok(ip) = candidate.parse::<IpAddr>() else {
                continue;
            };
            match IpType::of(ip) {
                kind @ (IpType::Public | IpType::Private) => {
                    primary = Some((candidate, kind));
                    break;
                }
                IpType::Local if primary.is_none() => {
                    primary = Some((candidate, IpType::Local));
                }
                _ => {}
            }
        }

        let (primary_ip, ip_type) = match primary {
            Some((ip, kind)) => (Some(ip), Some(kind)),
            None => match peer {
                Some(addr) => (Some(addr.to_string()), Some(IpType::classify(addr))),
                None => (None, None),
            },
        };

        Self {
            primary_ip,
            ip_type,
            remote_addr: peer.map(str::to_string),
            x_forwarded_for: header_value(headers, X_FORWARDED_FOR),
            x_real_ip: header_value(headers, X_REAL_IP),
            x_client_ip: header_value(headers, X_CLIENT_IP),
            all_headers: candidates,
        }
    }

    /// 转发头快照（JSON 对象）
    pub fn headers_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .all_headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value
                        .clone()
                        .map(serde_json::Value::String)
                        .unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn test_rate_limit_key_order() {
        let h = headers(&[
            ("x-forwarded-for", "9.9.9.9, 10.0.0.1"),
            ("x-client-ip", "8.8.8.8"),
            ("x-real-ip", "7.7.7.7"),
        ]);
        assert_eq!(resolve_client_ip(&h, Some("1.1.1.1")), "7.7.7.7");

        let h = headers(&[("x-forwarded-for", " 9.9.9.9 , 10.0.0.1")]);
        assert_eq!(resolve_client_ip(&h, Some("1.1.1.1")), "9.9.9.9");

        assert_eq!(resolve_client_ip(&HeaderMap::new(), Some("1.1.1.1")), "1.1.1.1");
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn test_ip_type_classification() {
        assert_eq!(IpType::classify("8.8.8.8"), IpType::Public);
        assert_eq!(IpType::classify("192.168.1.20"), IpType::Private);
        assert_eq!(IpType::classify("127.0.0.1"), IpType::Local);
        assert_eq!(IpType::classify("::1"), IpType::Local);
        assert_eq!(IpType::classify("fd00::1"), IpType::Private);
        assert_eq!(IpType::classify("not-an-ip"), IpType::Unknown);
    }

    #[test]
    fn test_info_prefers_cloudflare_header() {
        let h = headers(&[
            ("cf-connecting-ip", "203.0.113.5"),
            ("x-real-ip", "10.0.0.3"),
        ]);
        let info = ClientIpInfo::resolve(&h, Some("127.0.0.1"));
        assert_eq!(info.primary_ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(info.ip_type, Some(IpType::Public));
        assert_eq!(info.x_real_ip.as_deref(), Some("10.0.0.3"));
        assert_eq!(info.remote_addr.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_info_skips_loopback_when_better_exists() {
        let h = headers(&[
            ("x-real-ip", "127.0.0.1"),
            ("x-forwarded-for", "198.51.100.7, 10.0.0.1"),
        ]);
        let info = ClientIpInfo::resolve(&h, Some("127.0.0.1"));
        assert_eq!(info.primary_ip.as_deref(), Some("198.51.100.7"));
        assert_eq!(info.ip_type, Some(IpType::Public));
    }

    #[test]
    fn test_info_keeps_loopback_and_invalid_fallback() {
        let info = ClientIpInfo::resolve(&HeaderMap::new(), Some("127.0.0.1"));
        assert_eq!(info.primary_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(info.ip_type, Some(IpType::Local));

        let h = headers(&[("x-real-ip", "garbage")]);
        let info = ClientIpInfo::resolve(&h, Some("somehost"));
        assert_eq!(info.primary_ip.as_deref(), Some("somehost"));
        assert_eq!(info.ip_type, Some(IpType::Unknown));
    }
}
