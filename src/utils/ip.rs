//! IP 地址处理工具
//!
//! 提供统一的客户端 IP 提取功能：
//! - X-Forwarded-For 取第一个条目（原始客户端，后续跳是中间代理追加的）
//! - 无转发头时回退到连接层 peer 地址

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 从 HeaderMap 提取转发的 IP（X-Forwarded-For 第一个条目，去除空白）
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 解析请求的有效来源地址
///
/// 有 X-Forwarded-For 时以其第一个条目为准，否则使用连接 peer IP。
pub fn effective_source_addr(req: &HttpRequest) -> Option<String> {
    extract_forwarded_ip_from_headers(req.headers())
        .or_else(|| req.connection_info().peer_addr().map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn forwarded_ip_takes_first_entry_trimmed() {
        let headers = headers_with_xff("203.0.113.5, 10.0.0.1");
        assert_eq!(
            extract_forwarded_ip_from_headers(&headers),
            Some("203.0.113.5".to_string())
        );

        // 带空白
        let headers = headers_with_xff("  198.51.100.7 ,10.0.0.1");
        assert_eq!(
            extract_forwarded_ip_from_headers(&headers),
            Some("198.51.100.7".to_string())
        );
    }

    #[test]
    fn forwarded_ip_absent_or_empty() {
        assert_eq!(extract_forwarded_ip_from_headers(&HeaderMap::new()), None);

        let headers = headers_with_xff("  ");
        assert_eq!(extract_forwarded_ip_from_headers(&headers), None);
    }
}
