//! Wire format: JSON text frames in, raw text frames out.

use socket_chat_core::ChatMessage;
use tokio_tungstenite::tungstenite::Message;

/// What an inbound frame means to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A chat payload.
    Chat(ChatMessage),
    /// The peer is closing.
    Closed,
    /// Control frame or undecodable payload.
    Skip,
}

/// Classify one inbound frame.
///
/// Binary frames are accepted when they hold UTF-8 text. Payloads that do
/// not decode are logged and skipped.
#[must_use]
pub fn decode(msg: &Message) -> Inbound {
    let text = match msg {
        Message::Text(text) => text.as_str(),
        Message::Binary(data) => match std::str::from_utf8(data) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!(len = data.len(), "Dropping non-UTF-8 binary frame");
                return Inbound::Skip;
            }
        },
        Message::Close(_) => return Inbound::Closed,
        _ => return Inbound::Skip,
    };

    match ChatMessage::from_json(text) {
        Ok(chat) => Inbound::Chat(chat),
        Err(e) => {
            tracing::warn!("Invalid chat message: {e}");
            Inbound::Skip
        }
    }
}

/// Build the outbound frame for raw text.
#[must_use]
pub fn encode(text: String) -> Message {
    Message::Text(text.into())
}
