//! Core types for the socket chat client.
//!
//! This crate provides the pieces shared by the adapter and the display:
//! - `ChatMessage` / `SocketEvent` - What the connection emits
//! - `MessageLog` - Append-only display log and its markup rule
//! - `ChatConfig` - Endpoint configuration
//! - `ChatSink` trait and `ChatError`

pub mod config;
pub mod event;
pub mod message_log;
pub mod traits;

pub use config::ChatConfig;
pub use event::{ChatMessage, ConnectionState, SocketEvent};
pub use message_log::{Markup, MessageLog};
pub use traits::{ChatError, ChatSink};
