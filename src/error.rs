//! 统一错误模型
//! 后端返回的结构化错误与传输层失败在这里归一为同一个类型

use serde_json::Value;
use thiserror::Error;

/// 访问层错误类型
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 后端以非 2xx 状态返回了可解析的 JSON 响应体，原样保留
    #[error("Backend rejected request with status {status}: {body}")]
    Application { status: u16, body: Value },

    /// 没有可用的响应：网络不可达、超时、响应体无法解析等
    #[error("Transport error: {0}")]
    Transport(String),

    /// 发出请求前在客户端被拒绝
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// 按优先级检查的字段错误
const FIELD_ERROR_KEYS: [(&str, &str); 3] = [
    ("username", "Username"),
    ("email", "Email"),
    ("password", "Password"),
];

/// 按优先级检查的通用错误字段
const MESSAGE_KEYS: [&str; 4] = ["non_field_errors", "detail", "error", "message"];

impl ApiError {
    /// 后端返回的 HTTP 状态码，非后端错误时为 0
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Application { status, .. } => *status,
            _ => 0,
        }
    }

    /// 后端返回的原始错误体
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Application { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Application { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// 获取可直接展示给用户的单行错误消息
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Application { status, body } => message_from_body(body)
                .unwrap_or_else(|| format!("Request failed ({})", status)),
            ApiError::Transport(msg) | ApiError::Validation(msg) => msg.clone(),
            ApiError::Config(_) => "Configuration error".to_string(),
        }
    }

    // 便捷方法
    pub fn transport(msg: &str) -> Self {
        ApiError::Transport(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        ApiError::Validation(msg.to_string())
    }
}

/// 从后端错误体中提取展示消息
fn message_from_body(body: &Value) -> Option<String> {
    if let Value::String(text) = body {
        return Some(text.clone()).filter(|text| !text.is_empty());
    }

    let object = body.as_object()?;

    for (key, label) in FIELD_ERROR_KEYS {
        if let Some(text) = object.get(key).and_then(flatten_messages) {
            return Some(format!("{}: {}", label, text));
        }
    }

    MESSAGE_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(flatten_messages))
}

/// 字符串原样返回，数组以 ", " 拼接
fn flatten_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

/// 传输层错误归类为可读消息
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            "Request timed out".to_string()
        } else if e.is_connect() {
            format!("Network unreachable: {}", e)
        } else if e.is_decode() || e.is_body() {
            format!("Malformed response body: {}", e)
        } else if e.is_builder() {
            format!("Invalid request: {}", e)
        } else {
            format!("Network error: {}", e)
        };
        ApiError::Transport(message)
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(e: config::ConfigError) -> Self {
        ApiError::Config(e.to_string())
    }
}
