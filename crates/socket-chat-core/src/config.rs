//! Endpoint configuration for the chat connection.

use serde::{Deserialize, Serialize};

/// Address the client connects to when nothing overrides it.
pub const DEFAULT_URL: &str = "ws://localhost:12345/ws";

/// Environment variable that overrides the endpoint.
pub const URL_ENV: &str = "CHAT_WS_URL";

/// Connection configuration.
///
/// The endpoint address is the only setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// WebSocket URL of the chat relay.
    pub url: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
        }
    }
}

impl ChatConfig {
    /// Create a config for an explicit endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Default config, with the endpoint taken from `CHAT_WS_URL` if set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(url) => {
                tracing::debug!(%url, "endpoint overridden by {URL_ENV}");
                Self::new(url)
            }
            None => Self::default(),
        }
    }
}
