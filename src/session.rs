//! Chat session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions. The
//! session owns the visible message list, the pending input and the waiting
//! flag; all I/O is described by [`Effect`]s for the runtime to execute.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{ChatReply, Event};
pub use state::{Phase, SessionState, SUGGESTIONS};
pub use transition::{transition, TransitionError, TransitionResult, FALLBACK_REPLY};
