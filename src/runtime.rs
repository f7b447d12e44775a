//! Runtime for executing chat sessions
//!
//! Feeds events through the pure session transition function, executes the
//! resulting effects, and publishes snapshots for a view to render.

mod executor;
mod http;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{SessionRuntime, SessionSnapshot};
pub use http::HttpTransport;
pub use traits::*;

use crate::session::{Event, SessionState};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Handle to interact with a running session
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub snapshot_rx: watch::Receiver<SessionSnapshot>,
}

/// Start a session runtime in the background
///
/// The runtime stops once every `event_tx` clone is dropped and no request
/// is in flight.
#[must_use]
pub fn spawn_session<T>(transport: T) -> (SessionHandle, JoinHandle<SessionState>)
where
    T: ChatTransport + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

    let runtime = SessionRuntime::new(transport, event_rx, snapshot_tx);
    let task = tokio::spawn(runtime.run());

    (
        SessionHandle {
            event_tx,
            snapshot_rx,
        },
        task,
    )
}
