//! HTTP transport posting to `/api/chat`

use super::traits::{ChatTransport, TransportError};
use crate::api::ChatRequest;
use crate::message::Message;
use crate::session::ChatReply;
use async_trait::async_trait;
use serde::Deserialize;

/// Either field may be present; `error` takes precedence
#[derive(Deserialize)]
struct ReplyBody {
    message: Option<String>,
    error: Option<String>,
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, history: &[Message]) -> Result<ChatReply, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                messages: history.to_vec(),
            })
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        // Error payloads arrive with 4xx/5xx statuses; decode the body regardless
        let status = response.status();
        let body: ReplyBody = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(format!("HTTP {status}: {e}")))?;

        match body {
            ReplyBody {
                error: Some(error), ..
            } if !error.is_empty() => Ok(ChatReply::Error(error)),
            ReplyBody {
                message: Some(message),
                ..
            } => Ok(ChatReply::Message(message)),
            _ => Err(TransportError::Decode(format!(
                "HTTP {status}: neither message nor error in body"
            ))),
        }
    }
}
