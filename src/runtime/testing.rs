//! Mock implementations for testing
//!
//! These mocks enable runtime tests without real I/O.

use super::traits::*;
use crate::message::Message;
use crate::session::ChatReply;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that returns queued replies
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<ChatReply, TransportError>>>,
    /// Record of every history sent
    pub requests: Mutex<Vec<Vec<Message>>>,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
    /// When set, each request waits for a permit before answering
    gate: Option<Arc<Semaphore>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            request_started: Arc::new(Notify::new()),
            gate: None,
        }
    }

    /// Hold every request in flight until [`MockTransport::release`]
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new()
        }
    }

    /// Let one held request complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn queue_message(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ChatReply::Message(text.into())));
    }

    pub fn queue_error_payload(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ChatReply::Error(text.into())));
    }

    pub fn queue_failure(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, history: &[Message]) -> Result<ChatReply, TransportError> {
        self.requests.lock().unwrap().push(history.to_vec());
        self.request_started.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("No mock reply queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{spawn_session, SessionSnapshot};
    use crate::session::{Event, Phase, FALLBACK_REPLY};
    use tokio::sync::watch;

    async fn wait_for(
        rx: &mut watch::Receiver<SessionSnapshot>,
        done: impl FnMut(&SessionSnapshot) -> bool,
    ) -> SessionSnapshot {
        let snapshot = tokio::time::timeout(std::time::Duration::from_secs(5), rx.wait_for(done))
            .await
            .expect("timed out waiting for snapshot")
            .unwrap();
        SessionSnapshot::clone(&snapshot)
    }

    async fn submit(tx: &tokio::sync::mpsc::Sender<Event>, text: &str) {
        tx.send(Event::InputChanged(text.to_string())).await.unwrap();
        tx.send(Event::Submit).await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_transport() {
        let mock = MockTransport::new();
        mock.queue_message("Hello");

        let reply = mock.send(&[Message::user("hi")]).await.unwrap();
        assert_eq!(reply, ChatReply::Message("Hello".into()));

        // Nothing queued: behaves like a dead server
        assert!(mock.send(&[Message::user("hi")]).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_reply_round_trip() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_message("你好！");
        let (mut handle, task) = spawn_session(transport.clone());

        submit(&handle.event_tx, "你好").await;
        let snapshot = wait_for(&mut handle.snapshot_rx, |s| s.state.messages.len() == 2).await;

        assert_eq!(snapshot.state.phase, Phase::Idle);
        assert_eq!(
            snapshot.state.messages,
            vec![Message::user("你好"), Message::assistant("你好！")]
        );
        // Scrolled once on submit and once on reply
        assert_eq!(snapshot.scroll_generation, 2);
        assert_eq!(transport.recorded_requests(), vec![vec![Message::user("你好")]]);

        drop(handle);
        let final_state = task.await.unwrap();
        assert_eq!(final_state.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_while_waiting_is_ignored() {
        let transport = Arc::new(MockTransport::gated());
        transport.queue_message("first reply");
        let (mut handle, _task) = spawn_session(transport.clone());

        submit(&handle.event_tx, "first").await;
        transport.request_started.notified().await;
        wait_for(&mut handle.snapshot_rx, |s| s.state.is_waiting()).await;

        // Both the edit and the submit are rejected while waiting
        submit(&handle.event_tx, "second").await;

        transport.release();
        let snapshot = wait_for(&mut handle.snapshot_rx, |s| !s.state.is_waiting()).await;

        assert_eq!(
            snapshot.state.messages,
            vec![Message::user("first"), Message::assistant("first reply")]
        );
        assert_eq!(transport.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_appends_fallback() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_failure(TransportError::Request("connection refused".into()));
        let (mut handle, _task) = spawn_session(transport.clone());

        submit(&handle.event_tx, "hello").await;
        let snapshot = wait_for(&mut handle.snapshot_rx, |s| s.state.messages.len() == 2).await;

        assert_eq!(snapshot.state.phase, Phase::Idle);
        assert_eq!(
            snapshot.state.messages.last(),
            Some(&Message::assistant(FALLBACK_REPLY))
        );
    }

    #[tokio::test]
    async fn test_error_payload_is_shown() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_error_payload("服务器错误，请稍后再试");
        let (mut handle, _task) = spawn_session(transport.clone());

        submit(&handle.event_tx, "hello").await;
        let snapshot = wait_for(&mut handle.snapshot_rx, |s| s.state.messages.len() == 2).await;

        assert_eq!(
            snapshot.state.messages.last(),
            Some(&Message::assistant("错误: 服务器错误，请稍后再试"))
        );
    }

    #[tokio::test]
    async fn test_blank_submit_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let (handle, task) = spawn_session(transport.clone());

        submit(&handle.event_tx, "   ").await;
        drop(handle);

        let final_state = task.await.unwrap();
        assert!(final_state.messages.is_empty());
        assert!(transport.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_request_completes_after_hangup() {
        let transport = Arc::new(MockTransport::gated());
        transport.queue_message("late reply");
        let (handle, task) = spawn_session(transport.clone());

        submit(&handle.event_tx, "question").await;
        transport.request_started.notified().await;
        drop(handle);
        transport.release();

        let final_state = task.await.unwrap();
        assert_eq!(final_state.phase, Phase::Idle);
        assert_eq!(
            final_state.messages.last(),
            Some(&Message::assistant("late reply"))
        );
    }
}
