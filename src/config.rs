//! 配置系统
//! 从环境变量加载后端地址、请求超时与日志配置

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use url::Url;

/// 未设置时使用的本地后端地址
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// 后端根地址，例如 "http://localhost:8000"
    pub base_url: String,
    /// 聊天机器人地址（可选，缺省时与后端根地址相同）
    pub chat_url: Option<String>,
    /// 单次请求的超时上限（秒）
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty, compact
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                chat_url: None,
                request_timeout_secs: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

impl ClientConfig {
    /// 以指定后端地址构建配置，其余项取默认值
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.backend.base_url = base_url.into();
        config
    }

    /// 先加载 .env 文件（开发环境），再从环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        settings = settings
            .set_default("backend.base_url", DEFAULT_BASE_URL)?
            .set_default("backend.request_timeout_secs", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?;

        // 前缀为 MUSEUM_，嵌套分隔符为 __
        settings = settings.add_source(
            Environment::with_prefix("MUSEUM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ClientConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// 聊天机器人根地址
    pub fn chat_base_url(&self) -> &str {
        self.backend
            .chat_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(self.backend.base_url.as_str())
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("backend.base_url", &self.backend.base_url)?;

        if let Some(chat_url) = self.backend.chat_url.as_deref() {
            if !chat_url.trim().is_empty() {
                validate_http_url("backend.chat_url", chat_url)?;
            }
        }

        if self.backend.request_timeout_secs == 0 || self.backend.request_timeout_secs > 300 {
            return Err(ConfigError::Message(
                "request_timeout_secs must be between 1 and 300".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty, compact",
                    self.logging.format
                )))
            }
        }

        Ok(())
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Message(format!("Invalid {}: {} ({})", key, value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Message(format!(
            "Invalid {}: unsupported scheme '{}', expected http or https",
            key, other
        ))),
    }
}
