//! 数据模型模块
//! 请求/响应记录，只在单次调用内有效

pub mod auth;
pub mod chat;
pub mod museum;

pub use auth::{Registration, TokenPair};
pub use chat::ChatReply;
pub use museum::{Booking, Museum};
