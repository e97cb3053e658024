//! Support chat models

use serde::{Deserialize, Serialize};

/// 后端未给出回复文本时的兜底内容
pub const DEFAULT_CHAT_REPLY: &str = "I received your message!";

/// Chat request
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub user_query: &'a str,
    pub token: &'a str,
}

/// Chat bot response; the reply text may come under several keys
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
}

impl From<ChatResponse> for ChatReply {
    fn from(resp: ChatResponse) -> Self {
        let text = [resp.response, resp.answer, resp.message]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_CHAT_REPLY.to_string());

        Self { text }
    }
}
