//! Property-based tests for the session state machine
//!
//! These tests drive arbitrary event sequences and check:
//! - Waiting holds exactly while one request is unresolved
//! - Every accepted submit issues exactly one request
//! - Messages alternate user/assistant and only grow
//! - A transport failure appends exactly one fallback message

use super::*;
use crate::message::{Message, Role};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_reply() -> impl Strategy<Value = ChatReply> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}".prop_map(ChatReply::Message),
        "[a-zA-Z0-9 ]{1,20}".prop_map(ChatReply::Error),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => "[a-z ]{0,10}".prop_map(Event::InputChanged),
        1 => (0usize..5).prop_map(Event::SuggestionPicked),
        3 => Just(Event::Submit),
        2 => arb_reply().prop_map(Event::ReplyReceived),
        1 => "[a-z]{1,10}".prop_map(Event::TransportFailed),
    ]
}

/// Apply events, keeping the old state on rejection, and count requests
fn run(events: Vec<Event>) -> (SessionState, usize) {
    let mut state = SessionState::new();
    let mut requests = 0;
    for event in events {
        if let Ok(result) = transition(&state, event) {
            requests += result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::RequestReply { .. }))
                .count();
            state = result.new_state;
        }
    }
    (state, requests)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Waiting exactly when the last message is an unanswered user message
    #[test]
    fn prop_waiting_iff_unanswered(events in proptest::collection::vec(arb_event(), 0..40)) {
        let (state, _) = run(events);
        let unanswered = state.messages.last().is_some_and(Message::is_user);
        prop_assert_eq!(state.is_waiting(), unanswered);
    }

    /// One request per user message, never more
    #[test]
    fn prop_one_request_per_submit(events in proptest::collection::vec(arb_event(), 0..40)) {
        let (state, requests) = run(events);
        let user_messages = state.messages.iter().filter(|m| m.is_user()).count();
        prop_assert_eq!(requests, user_messages);
    }

    /// Roles strictly alternate starting with the user
    #[test]
    fn prop_roles_alternate(events in proptest::collection::vec(arb_event(), 0..40)) {
        let (state, _) = run(events);
        for (i, message) in state.messages.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            prop_assert_eq!(message.role, expected);
        }
    }

    /// Accepted transitions never drop or rewrite earlier messages
    #[test]
    fn prop_history_is_append_only(
        events in proptest::collection::vec(arb_event(), 0..40),
        next in arb_event(),
    ) {
        let (state, _) = run(events);
        if let Ok(result) = transition(&state, next) {
            let new = &result.new_state.messages;
            prop_assert!(new.len() >= state.messages.len());
            prop_assert!(new.len() <= state.messages.len() + 1);
            prop_assert_eq!(&new[..state.messages.len()], &state.messages[..]);
        }
    }

    /// Submitting while waiting is always rejected
    #[test]
    fn prop_submit_rejected_while_waiting(
        events in proptest::collection::vec(arb_event(), 0..40),
        input in "[a-z]{1,10}",
    ) {
        let (mut state, _) = run(events);
        if state.is_waiting() {
            state.pending_input = input;
            prop_assert_eq!(transition(&state, Event::Submit).unwrap_err(), TransitionError::Busy);
        }
    }

    /// A failed request adds exactly the fallback message and returns to idle
    #[test]
    fn prop_transport_failure_appends_fallback(
        events in proptest::collection::vec(arb_event(), 0..40),
        reason in "[a-z]{1,10}",
    ) {
        let (state, _) = run(events);
        if state.is_waiting() {
            let result = transition(&state, Event::TransportFailed(reason)).unwrap();
            prop_assert_eq!(result.new_state.phase, Phase::Idle);
            prop_assert_eq!(result.new_state.messages.len(), state.messages.len() + 1);
            prop_assert_eq!(
                result.new_state.messages.last(),
                Some(&Message::assistant(FALLBACK_REPLY))
            );
        }
    }
}
