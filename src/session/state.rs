//! Session state types

use crate::message::Message;

/// Prompts offered on the welcome screen
pub const SUGGESTIONS: [&str; 3] = ["介绍一下人工智能", "写一首关于春天的诗", "解释一下量子计算"];

/// Whether a request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Waiting,
}

/// Everything one chat session displays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub pending_input: String,
    pub phase: Phase,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.phase == Phase::Waiting
    }

    /// Submit is possible: idle with non-blank input
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_waiting() && !self.pending_input.trim().is_empty()
    }

    /// The welcome screen shows until the first message
    #[must_use]
    pub fn shows_welcome(&self) -> bool {
        self.messages.is_empty()
    }
}
