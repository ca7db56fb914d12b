//! Events emitted by the chat connection.

use serde::{Deserialize, Serialize};

use crate::ChatError;

/// Log line appended when the connection opens.
pub const CONNECTED_NOTICE: &str = "User has connected to the channel";

/// Log line appended when the connection closes.
pub const DISCONNECTED_NOTICE: &str = "User has disconnected from the channel";

/// Inbound chat payload.
///
/// The relay omits empty fields, so a missing `content` decodes as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body.
    #[serde(default)]
    pub content: String,
    /// Who sent it, if the relay says.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Addressee; carried but never displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

impl ChatMessage {
    /// Create a message with no sender.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Attach a sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Parse one inbound text frame.
    ///
    /// # Errors
    /// Returns `ChatError::Decode` if the frame is not a JSON object of the
    /// expected shape.
    pub fn from_json(text: &str) -> Result<Self, ChatError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The line shown in the log: `sender: content`, or just `content`
    /// when the sender is absent or empty.
    #[must_use]
    pub fn display_line(&self) -> String {
        match self.sender.as_deref() {
            Some(sender) if !sender.is_empty() => format!("{sender}: {}", self.content),
            _ => self.content.clone(),
        }
    }
}

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Handshake completed.
    Open,
    /// Connection ended, for any reason. Emitted once.
    Close,
    /// An inbound message arrived.
    Message(ChatMessage),
}

impl SocketEvent {
    /// The log line this event contributes.
    #[must_use]
    pub fn display_line(&self) -> String {
        match self {
            Self::Open => CONNECTED_NOTICE.to_string(),
            Self::Close => DISCONNECTED_NOTICE.to_string(),
            Self::Message(msg) => msg.display_line(),
        }
    }
}

/// Whether the socket is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Handshake done, not yet closed.
    Open,
    /// Not open: still connecting, failed, or finished.
    #[default]
    Closed,
}

impl ConnectionState {
    /// Returns true when open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}
