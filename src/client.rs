//! 后端 API 客户端
//!
//! 每个操作对应一次无状态的 HTTP 调用，token 由调用方逐次传入。
//! 所有失败都归一为 [`ApiError`]：
//! - 非 2xx 且响应体为 JSON：`ApiError::Application`，响应体原样保留
//! - 其余情况（网络失败、超时、响应体无法解析）：`ApiError::Transport`

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::error::{ApiError, Result};
use crate::headers::build_headers;
use crate::models::auth::{LoginRequest, RefreshTokenRequest, RefreshTokenResponse};
use crate::models::chat::{ChatRequest, ChatResponse};
use crate::models::{Booking, ChatReply, Museum, Registration, TokenPair};

/// 博物馆后端 API 客户端
///
/// 内部只持有连接池与端点表，可廉价克隆并在多个任务间并发使用。
#[derive(Debug, Clone)]
pub struct MuseumClient {
    client: Client,
    endpoints: Arc<Endpoints>,
}

impl MuseumClient {
    /// 创建新的客户端
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoints: Arc::new(Endpoints::from_config(config)),
        })
    }

    /// 以默认配置指向指定后端
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ClientConfig::with_base_url(base_url))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// 用户登录
    pub async fn login(&self, username: &str, password: &str) -> Result<Value> {
        let request = self
            .client
            .post(&self.endpoints.login)
            .headers(build_headers(None))
            .json(&LoginRequest { username, password });

        self.execute("login", request).await
    }

    /// 用户注册；两次密码不一致时不发出任何请求
    pub async fn register(&self, registration: &Registration) -> Result<Value> {
        registration.validate().map_err(|e| ApiError::validation(&e))?;

        let request = self
            .client
            .post(&self.endpoints.register)
            .headers(build_headers(None))
            .json(&registration.to_request());

        self.execute("register", request).await
    }

    /// 获取 JWT 令牌对
    pub async fn obtain_token(&self, username: &str, password: &str) -> Result<TokenPair> {
        let request = self
            .client
            .post(&self.endpoints.token_obtain)
            .headers(build_headers(None))
            .json(&LoginRequest { username, password });

        self.execute("obtain_token", request).await
    }

    /// 刷新访问令牌
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair> {
        let request = self
            .client
            .post(&self.endpoints.token_refresh)
            .headers(build_headers(None))
            .json(&RefreshTokenRequest {
                refresh: refresh_token,
            });

        let response: RefreshTokenResponse = self.execute("refresh_token", request).await?;
        Ok(response.into_pair(refresh_token))
    }

    /// 浏览博物馆列表（公开接口，token 可选）
    pub async fn browse_museums(&self, token: Option<&str>) -> Result<Vec<Museum>> {
        let request = self
            .client
            .get(&self.endpoints.browse_museums)
            .headers(build_headers(token));

        self.execute("browse_museums", request).await
    }

    /// 预约博物馆
    pub async fn book_museum(&self, museum_id: impl Display, token: &str) -> Result<Value> {
        let request = self
            .client
            .post(self.endpoints.book_museum(museum_id))
            .headers(build_headers(Some(token)))
            .json(&json!({}));

        self.execute("book_museum", request).await
    }

    /// 获取当前用户的预约列表
    pub async fn my_bookings(&self, token: &str) -> Result<Vec<Booking>> {
        let request = self
            .client
            .get(&self.endpoints.my_bookings)
            .headers(build_headers(Some(token)));

        self.execute("my_bookings", request).await
    }

    /// 取消预约
    pub async fn cancel_booking(&self, booking_id: impl Display, token: &str) -> Result<Value> {
        let request = self
            .client
            .post(self.endpoints.cancel_booking(booking_id))
            .headers(build_headers(Some(token)))
            .json(&json!({}));

        self.execute("cancel_booking", request).await
    }

    /// 向客服机器人发送消息；未登录时不发出请求
    pub async fn chat(&self, query: &str, token: &str) -> Result<ChatReply> {
        if token.is_empty() {
            return Err(ApiError::validation("Please log in to use the chat"));
        }

        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::validation("Message cannot be empty"));
        }

        let request = self
            .client
            .post(&self.endpoints.chat)
            .headers(build_headers(Some(token)))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&ChatRequest {
                user_query: query,
                token,
            });

        let response: ChatResponse = self.execute("chat", request).await?;
        Ok(response.into())
    }

    /// 发送请求并按统一策略解析响应
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let result = self.send(operation, request).await;

        if let Err(ref err) = result {
            warn!(
                operation,
                status = err.code(),
                error = %err,
                "Backend request failed"
            );
        }

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        debug!(
            operation,
            url = %response.url(),
            status = status.as_u16(),
            "Backend responded"
        );

        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

/// 解析响应体
///
/// 2xx 时按目标类型解析，失败视为传输层错误；
/// 非 2xx 时能解析为 JSON 则原样作为后端错误返回。
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    if status.is_success() {
        return serde_json::from_slice(body)
            .map_err(|e| ApiError::Transport(format!("Malformed response body: {}", e)));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(body) => Err(ApiError::Application {
            status: status.as_u16(),
            body,
        }),
        Err(_) => Err(ApiError::Transport(format!(
            "Server error: {}",
            status.as_u16()
        ))),
    }
}
