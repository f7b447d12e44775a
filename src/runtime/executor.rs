//! Session runtime executor

use super::traits::ChatTransport;
use crate::session::{transition, Effect, Event, SessionState, TransitionError};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// What a view needs to render a session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Bumped whenever the view should jump to the newest message
    pub scroll_generation: u64,
}

/// Session runtime generic over the transport
pub struct SessionRuntime<T>
where
    T: ChatTransport + 'static,
{
    state: SessionState,
    scroll_generation: u64,
    transport: Arc<T>,
    /// Events from the view
    event_rx: mpsc::Receiver<Event>,
    /// Resolutions of in-flight requests
    resolution_tx: mpsc::Sender<Event>,
    resolution_rx: mpsc::Receiver<Event>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl<T> SessionRuntime<T>
where
    T: ChatTransport + 'static,
{
    #[must_use]
    pub fn new(
        transport: T,
        event_rx: mpsc::Receiver<Event>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
    ) -> Self {
        let (resolution_tx, resolution_rx) = mpsc::channel(4);
        Self {
            state: SessionState::new(),
            scroll_generation: 0,
            transport: Arc::new(transport),
            event_rx,
            resolution_tx,
            resolution_rx,
            snapshot_tx,
        }
    }

    /// Process events until the view hangs up, then let any in-flight
    /// request resolve. Returns the final state.
    pub async fn run(mut self) -> SessionState {
        tracing::debug!("Starting session runtime");
        self.publish();

        let mut inputs_open = true;
        loop {
            if !inputs_open && !self.state.is_waiting() {
                break;
            }

            tokio::select! {
                event = self.event_rx.recv(), if inputs_open => match event {
                    Some(event) => self.handle(event),
                    None => inputs_open = false,
                },
                Some(event) = self.resolution_rx.recv() => self.handle(event),
                else => break,
            }
        }

        tracing::debug!(messages = self.state.messages.len(), "Session runtime stopped");
        self.state
    }

    fn handle(&mut self, event: Event) {
        if let Err(e) = self.process_event(event) {
            // Rejected events are no-ops
            tracing::debug!(error = %e, "Event rejected");
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.publish();
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestReply { history } => {
                let transport = Arc::clone(&self.transport);
                let resolution_tx = self.resolution_tx.clone();
                tracing::debug!(history_len = history.len(), "Requesting reply");

                tokio::spawn(async move {
                    let event = match transport.send(&history).await {
                        Ok(reply) => Event::ReplyReceived(reply),
                        Err(e) => {
                            tracing::warn!(error = %e, "Chat request failed");
                            Event::TransportFailed(e.to_string())
                        }
                    };
                    // A closed channel means the session is gone
                    let _ = resolution_tx.send(event).await;
                });
            }
            Effect::ScrollToBottom => {
                self.scroll_generation += 1;
            }
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            state: self.state.clone(),
            scroll_generation: self.scroll_generation,
        });
    }
}
