//! Events that can occur in a chat session

/// What the server answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// `{"message": ...}`
    Message(String),
    /// `{"error": ...}`
    Error(String),
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    InputChanged(String),
    SuggestionPicked(usize),
    Submit,

    // Network resolution
    ReplyReceived(ChatReply),
    TransportFailed(String),
}
