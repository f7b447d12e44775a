//! Pure state transition function

use super::{ChatReply, Effect, Event, Phase, SessionState, SUGGESTIONS};
use crate::message::Message;
use thiserror::Error;

/// Assistant message shown when the request never produced a reply
pub const FALLBACK_REPLY: &str = "抱歉，发生了错误。请稍后再试。";

/// Prefix for error payloads reported by the server
const ERROR_PREFIX: &str = "错误: ";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is rejected. A rejected event leaves the state as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending")]
    Busy,
    #[error("Input is blank")]
    BlankInput,
    #[error("No suggestion at index {0}")]
    UnknownSuggestion(usize),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same state and event it always produces the same result.
///
/// # Errors
///
/// A [`TransitionError`] means the event does not apply in this state; the
/// caller keeps the old state.
pub fn transition(
    state: &SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // ============================================================
        // Input editing
        // ============================================================
        (Phase::Idle, Event::InputChanged(text)) => Ok(TransitionResult::new(SessionState {
            pending_input: text,
            ..state.clone()
        })),

        (Phase::Idle, Event::SuggestionPicked(index)) => {
            let suggestion = SUGGESTIONS
                .get(index)
                .ok_or(TransitionError::UnknownSuggestion(index))?;
            Ok(TransitionResult::new(SessionState {
                pending_input: (*suggestion).to_string(),
                ..state.clone()
            }))
        }

        // Idle + Submit -> Waiting
        (Phase::Idle, Event::Submit) => {
            if state.pending_input.trim().is_empty() {
                return Err(TransitionError::BlankInput);
            }

            let mut messages = state.messages.clone();
            messages.push(Message::user(state.pending_input.clone()));

            Ok(TransitionResult::new(SessionState {
                messages: messages.clone(),
                pending_input: String::new(),
                phase: Phase::Waiting,
            })
            .with_effect(Effect::ScrollToBottom)
            .with_effect(Effect::RequestReply { history: messages }))
        }

        // Input is disabled while a reply is pending
        (
            Phase::Waiting,
            Event::InputChanged(_) | Event::SuggestionPicked(_) | Event::Submit,
        ) => Err(TransitionError::Busy),

        // ============================================================
        // Network resolution
        // ============================================================

        // Waiting + ReplyReceived -> Idle
        (Phase::Waiting, Event::ReplyReceived(reply)) => {
            let content = match reply {
                ChatReply::Message(text) => text,
                ChatReply::Error(text) => format!("{ERROR_PREFIX}{text}"),
            };
            Ok(resolve(state, Message::assistant(content)))
        }

        // Waiting + TransportFailed -> Idle
        (Phase::Waiting, Event::TransportFailed(_)) => {
            Ok(resolve(state, Message::assistant(FALLBACK_REPLY)))
        }

        (Phase::Idle, event @ (Event::ReplyReceived(_) | Event::TransportFailed(_))) => Err(
            TransitionError::InvalidTransition(format!("No request in flight for {event:?}")),
        ),
    }
}

fn resolve(state: &SessionState, reply: Message) -> TransitionResult {
    let mut messages = state.messages.clone();
    messages.push(reply);
    TransitionResult::new(SessionState {
        messages,
        pending_input: state.pending_input.clone(),
        phase: Phase::Idle,
    })
    .with_effect(Effect::ScrollToBottom)
}
