//! Effects produced by state transitions

use crate::message::Message;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post the full history and wait for one reply
    RequestReply { history: Vec<Message> },

    /// Bring the newest message into view
    ScrollToBottom,
}
