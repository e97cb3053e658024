//! 端点注册表
//! 构造时一次性解析所有后端地址，之后不再变化

use std::fmt::Display;

use crate::config::ClientConfig;

/// 后端 API 路径前缀
const API_PREFIX: &str = "/lol/api";
/// 服务端渲染页面的路径前缀
const PAGE_PREFIX: &str = "/lol";

/// 逻辑操作到完整 URL 的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    chat_base_url: String,
    pub token_obtain: String,
    pub token_refresh: String,
    pub register: String,
    pub login: String,
    pub browse_museums: String,
    pub my_bookings: String,
    pub browse_page: String,
    pub chat: String,
}

impl Endpoints {
    /// 以同一个根地址解析后端与聊天端点
    pub fn new(base_url: &str) -> Self {
        Self::with_chat_base(base_url, base_url)
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_chat_base(&config.backend.base_url, config.chat_base_url())
    }

    pub fn with_chat_base(base_url: &str, chat_base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        let chat_base = chat_base_url.trim_end_matches('/').to_string();

        Self {
            token_obtain: format!("{}{}/token/", base, API_PREFIX),
            token_refresh: format!("{}{}/token/refresh/", base, API_PREFIX),
            register: format!("{}{}/register/", base, API_PREFIX),
            login: format!("{}{}/login/", base, API_PREFIX),
            browse_museums: format!("{}{}/browse/", base, API_PREFIX),
            my_bookings: format!("{}{}/my_bookings/", base, API_PREFIX),
            browse_page: format!("{}{}/browse/", base, PAGE_PREFIX),
            chat: format!("{}/chat", chat_base),
            base_url: base,
            chat_base_url: chat_base,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_base_url(&self) -> &str {
        &self.chat_base_url
    }

    /// id 原样插入路径，不做编码与校验
    pub fn book_museum(&self, museum_id: impl Display) -> String {
        format!("{}{}/book_museum/{}/", self.base_url, API_PREFIX, museum_id)
    }

    pub fn cancel_booking(&self, booking_id: impl Display) -> String {
        format!("{}{}/cancel_booking/{}/", self.base_url, API_PREFIX, booking_id)
    }

    pub fn museum_detail(&self, museum_id: impl Display) -> String {
        format!("{}{}/museum/{}/", self.base_url, PAGE_PREFIX, museum_id)
    }

    pub fn book_museum_page(&self, museum_id: impl Display) -> String {
        format!("{}{}/book_museum/{}/", self.base_url, PAGE_PREFIX, museum_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BASE_URL)
    }
}
