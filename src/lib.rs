//! 博物馆预约客户端库
//! 提供端点注册表、请求头构建、后端 API 客户端与会话上下文

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod headers;
pub mod models;
pub mod services;
pub mod session;
pub mod telemetry;

pub use client::MuseumClient;
pub use config::ClientConfig;
pub use endpoints::Endpoints;
pub use error::{ApiError, Result};
pub use session::{MemoryTokenStore, Session, TokenStore};
