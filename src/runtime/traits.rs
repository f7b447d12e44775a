//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::message::Message;
use crate::session::ChatReply;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failures that prevented any reply from arriving
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Undecodable reply: {0}")]
    Decode(String),
}

/// Client for fetching the next assistant reply
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the full history and wait for one reply
    async fn send(&self, history: &[Message]) -> Result<ChatReply, TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, history: &[Message]) -> Result<ChatReply, TransportError> {
        (**self).send(history).await
    }
}
