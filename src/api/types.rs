//! API request and response types

use crate::message::Message;
use serde::{Deserialize, Serialize};

/// Human-readable body for rejected chat requests
pub const INVALID_FORMAT_MESSAGE: &str = "无效的消息格式";

/// Body for unexpected server failures
pub const SERVER_ERROR_MESSAGE: &str = "服务器错误，请稍后再试";

/// Request to produce the next assistant reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Successful chat reply
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
