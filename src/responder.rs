//! Rule-based reply selection
//!
//! Replies are chosen by checking the last message of a conversation against
//! an ordered set of rules. Topic keywords are checked first, then the fixed
//! greeting, poetry, thanks and capability patterns. Anything else gets a
//! random filler phrase that echoes the user's text back.

pub mod rules;


use crate::message::Message;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rules::{
    fallback_reply, RuleTable, CAPABILITY_REPLY, CAPABILITY_WORDS, FILLER_PHRASES,
    GREETING_REPLY, GREETING_WORDS, POEM_REPLY, POETRY_WORDS, THANKS_REPLY, THANKS_WORDS,
};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while selecting a reply
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("Conversation history is empty")]
    EmptyHistory,
    #[error("Random source unavailable")]
    RandomSourceUnavailable,
}

/// Which rule produced a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Topic(String),
    Greeting,
    Poetry,
    Thanks,
    Capability,
    Fallback,
}

/// A selected reply and the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub kind: MatchKind,
    pub text: String,
}

impl Selection {
    fn fixed(kind: MatchKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

/// Pick a reply for the given history.
///
/// Only the content of the last message is inspected. The random source is
/// consulted only when no rule matches.
///
/// # Errors
///
/// Returns [`SelectError::EmptyHistory`] when `messages` is empty.
pub fn select_reply<R: Rng>(
    rules: &RuleTable,
    messages: &[Message],
    rng: &mut R,
) -> Result<Selection, SelectError> {
    let last = messages.last().ok_or(SelectError::EmptyHistory)?;
    let input = last.content.to_lowercase();

    if let Some(rule) = rules
        .iter()
        .find(|rule| input.contains(&rule.topic.to_lowercase()))
    {
        return Ok(Selection {
            kind: MatchKind::Topic(rule.topic.clone()),
            text: rule.reply.clone(),
        });
    }

    if contains_any(&input, &GREETING_WORDS) {
        return Ok(Selection::fixed(MatchKind::Greeting, GREETING_REPLY));
    }
    if contains_any(&input, &POETRY_WORDS) {
        return Ok(Selection::fixed(MatchKind::Poetry, POEM_REPLY));
    }
    if contains_any(&input, &THANKS_WORDS) {
        return Ok(Selection::fixed(MatchKind::Thanks, THANKS_REPLY));
    }
    if contains_any(&input, &CAPABILITY_WORDS) {
        return Ok(Selection::fixed(MatchKind::Capability, CAPABILITY_REPLY));
    }

    let filler = FILLER_PHRASES[rng.gen_range(0..FILLER_PHRASES.len())];
    Ok(Selection {
        kind: MatchKind::Fallback,
        text: fallback_reply(filler, &last.content),
    })
}

/// Shareable selector owning the rule table and the fallback random source
pub struct ResponseSelector {
    rules: RuleTable,
    rng: Mutex<StdRng>,
}

impl ResponseSelector {
    #[must_use]
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic fallback selection, for tests and reproducible demos
    #[must_use]
    pub fn seeded(rules: RuleTable, seed: u64) -> Self {
        Self {
            rules,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Pick a reply using the shared random source
    ///
    /// # Errors
    ///
    /// Fails on an empty history, or when a previous caller panicked while
    /// holding the random source.
    pub fn select(&self, messages: &[Message]) -> Result<Selection, SelectError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SelectError::RandomSourceUnavailable)?;
        select_reply(&self.rules, messages, &mut *rng)
    }
}

#[cfg(test)]
impl ResponseSelector {
    /// Poison the random source lock so every later selection fails
    pub(crate) fn poison_random_source(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.rng.lock();
            panic!("random source poisoned for test");
        }));
    }
}

impl std::fmt::Debug for ResponseSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSelector")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
