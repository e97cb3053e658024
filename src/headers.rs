//! 请求头构建

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::warn;

/// 绕过 ngrok 隧道的浏览器警告页
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// 构建请求头；token 非空时附加 Bearer 认证头
pub fn build_headers(token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(TUNNEL_BYPASS_HEADER),
        HeaderValue::from_static("true"),
    );

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                // 不记录 token 内容
                warn!("Bearer token is not a valid header value, sending request without it");
            }
        }
    }

    headers
}
