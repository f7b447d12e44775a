//! Canned-reply chat demo
//!
//! A browser or terminal UI posts the conversation to `POST /api/chat` and
//! gets back a reply picked by keyword rules.

pub mod api;
pub mod config;
pub mod message;
pub mod responder;
pub mod runtime;
pub mod session;
