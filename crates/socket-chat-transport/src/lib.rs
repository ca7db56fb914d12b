//! Connection adapter and display component for the chat client.
//!
//! Provides:
//! - Inbound frame decoding (feature: websocket)
//! - `SocketService` - one WebSocket, relayed as events (feature: websocket)
//! - `ChatView` - message log, input buffer and send rule
//! - ratatui rendering for `ChatView` (feature: tui)

pub mod subscription;
pub mod view;

#[cfg(feature = "websocket")]
pub mod protocol;

#[cfg(feature = "websocket")]
pub mod socket;

#[cfg(feature = "tui")]
pub mod tui;

pub use subscription::EventSubscription;
pub use view::ChatView;

#[cfg(feature = "websocket")]
pub use socket::SocketService;
