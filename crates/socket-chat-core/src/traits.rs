//! Outbound seam between the display and the connection.

use thiserror::Error;

/// Chat client error.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Channel closed")]
    ChannelClosed,
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where the display sends outbound text.
pub trait ChatSink: Send + Sync {
    /// Forward raw text to the peer.
    ///
    /// # Errors
    /// Returns error if the connection is gone.
    fn send(&self, text: &str) -> Result<(), ChatError>;

    /// Close the connection.
    fn close(&self);
}
