//! HTTP API for the chat demo
//!
//! `POST /api/chat` plus the embedded browser UI.

mod assets;
mod handlers;
mod types;


pub use handlers::create_router;
pub use types::*;

use crate::config::ServerConfig;
use crate::responder::ResponseSelector;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub selector: Arc<ResponseSelector>,
    pub latency: LatencyRange,
}

impl AppState {
    #[must_use]
    pub fn new(selector: ResponseSelector, config: &ServerConfig) -> Self {
        Self {
            selector: Arc::new(selector),
            latency: LatencyRange::new(config.latency_min, config.latency_max),
        }
    }
}

/// Bounds for the simulated processing delay before each reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    min: Duration,
    max: Duration,
}

impl LatencyRange {
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Uniformly random delay within the range
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.max == self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}
