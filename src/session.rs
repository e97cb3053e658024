//! 会话上下文
//!
//! 令牌不再作为全局可变状态存在：调用方持有 [`Session`]，每次调用时显式传入。
//! 持久化由调用方提供的 [`TokenStore`] 完成，键名固定。

use std::collections::HashMap;
use std::sync::RwLock;

use secrecy::{ExposeSecret, Secret};

use crate::models::TokenPair;

/// 访问令牌的持久化键名
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// 刷新令牌的持久化键名
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// 令牌持久化存储（键值对）
pub trait TokenStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// 内存中的令牌存储
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// 调用方持有的会话
#[derive(Debug, Clone, Default)]
pub struct Session {
    username: Option<String>,
    access_token: Option<Secret<String>>,
    refresh_token: Option<Secret<String>>,
}

impl Session {
    /// 未登录会话
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_tokens(username: impl Into<String>, tokens: TokenPair) -> Self {
        Self {
            username: Some(username.into()),
            access_token: Some(Secret::new(tokens.access)),
            refresh_token: Some(Secret::new(tokens.refresh)),
        }
    }

    /// 从持久化存储恢复；用户名不持久化
    pub fn restore(store: &dyn TokenStore) -> Self {
        let non_empty = |key: &str| store.get(key).filter(|v| !v.is_empty()).map(Secret::new);

        Self {
            username: None,
            access_token: non_empty(ACCESS_TOKEN_KEY),
            refresh_token: non_empty(REFRESH_TOKEN_KEY),
        }
    }

    /// 写入持久化存储
    pub fn persist(&self, store: &dyn TokenStore) {
        match &self.access_token {
            Some(token) => store.set(ACCESS_TOKEN_KEY, token.expose_secret()),
            None => store.remove(ACCESS_TOKEN_KEY),
        }
        match &self.refresh_token {
            Some(token) => store.set(REFRESH_TOKEN_KEY, token.expose_secret()),
            None => store.remove(REFRESH_TOKEN_KEY),
        }
    }

    /// 登出：清空会话并删除持久化的令牌
    pub fn clear(&mut self, store: &dyn TokenStore) {
        *self = Self::anonymous();
        store.remove(ACCESS_TOKEN_KEY);
        store.remove(REFRESH_TOKEN_KEY);
    }

    /// 刷新后替换令牌，用户名保持不变
    pub fn replace_tokens(&mut self, tokens: TokenPair) {
        self.access_token = Some(Secret::new(tokens.access));
        self.refresh_token = Some(Secret::new(tokens.refresh));
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some_and(|token| !token.is_empty())
    }
}
