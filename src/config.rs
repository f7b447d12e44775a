//! Environment configuration for the server and the terminal client

use crate::responder::rules::{RuleTable, RuleTableError};
use crate::responder::ResponseSelector;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LATENCY_MIN_MS: u64 = 500;
const DEFAULT_LATENCY_MAX_MS: u64 = 1500;
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Configuration errors that prevent startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Rules(#[from] RuleTableError),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Bounds of the simulated reply latency
    pub latency_min: Duration,
    pub latency_max: Duration,
    pub seed: Option<u64>,
    pub rules_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            latency_min: Duration::from_millis(DEFAULT_LATENCY_MIN_MS),
            latency_max: Duration::from_millis(DEFAULT_LATENCY_MAX_MS),
            seed: None,
            rules_path: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_or(&lookup, "CHAT_PORT", DEFAULT_PORT);
        let min_ms = parse_or(&lookup, "CHAT_LATENCY_MIN_MS", DEFAULT_LATENCY_MIN_MS);
        let mut max_ms = parse_or(&lookup, "CHAT_LATENCY_MAX_MS", DEFAULT_LATENCY_MAX_MS);
        if max_ms < min_ms {
            tracing::warn!(min_ms, max_ms, "Latency max below min, using min for both");
            max_ms = min_ms;
        }

        let seed = lookup("CHAT_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %raw, "Ignoring invalid CHAT_SEED");
                None
            }
        });

        Self {
            port,
            latency_min: Duration::from_millis(min_ms),
            latency_max: Duration::from_millis(max_ms),
            seed,
            rules_path: lookup("CHAT_RULES_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// No simulated latency; used by tests
    #[must_use]
    pub fn instant() -> Self {
        Self {
            latency_min: Duration::ZERO,
            latency_max: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Rules from `rules_path`, or the builtin table when unset
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rules`] when the configured file cannot be loaded.
    pub fn load_rules(&self) -> Result<RuleTable, ConfigError> {
        match &self.rules_path {
            Some(path) => Ok(RuleTable::from_json_file(path)?),
            None => Ok(RuleTable::builtin()),
        }
    }

    /// # Errors
    ///
    /// Same as [`ServerConfig::load_rules`].
    pub fn build_selector(&self) -> Result<ResponseSelector, ConfigError> {
        let rules = self.load_rules()?;
        Ok(match self.seed {
            Some(seed) => ResponseSelector::seeded(rules, seed),
            None => ResponseSelector::new(rules),
        })
    }
}

/// Terminal client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub log_path: Option<PathBuf>,
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = lookup("CHAT_SERVER_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        Self {
            server_url,
            log_path: lookup("CHAT_CLIENT_LOG").map(PathBuf::from),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
