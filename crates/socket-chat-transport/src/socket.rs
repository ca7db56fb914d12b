//! WebSocket connection adapter.

use std::{sync::Mutex, time::Duration};

use futures::{SinkExt, StreamExt};
use socket_chat_core::{ChatConfig, ChatError, ChatSink, ConnectionState, SocketEvent};
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};

use crate::{
    EventSubscription,
    protocol::{self, Inbound},
};

/// Event buffer per subscriber.
const EVENT_CAPACITY: usize = 1024;

enum Command {
    Send(String),
    Close,
}

/// Owns a single WebSocket and relays what happens on it.
///
/// The socket is opened on creation and closed by [`SocketService::close`]
/// or by dropping the service. There is no reconnect.
pub struct SocketService {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<SocketEvent>,
    first: Mutex<Option<broadcast::Receiver<SocketEvent>>>,
    state: watch::Receiver<ConnectionState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SocketService {
    /// Open a socket to `config.url`.
    ///
    /// Returns immediately; the handshake runs on a spawned task. Must be
    /// called from within a Tokio runtime.
    #[must_use]
    pub fn connect(config: &ChatConfig) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, first) = broadcast::channel(EVENT_CAPACITY);
        let (state_tx, state) = watch::channel(ConnectionState::Closed);

        let task = tokio::spawn(run_socket(
            config.url.clone(),
            command_rx,
            events.clone(),
            state_tx,
        ));

        Self {
            commands,
            events,
            first: Mutex::new(Some(first)),
            state,
            task: Mutex::new(Some(task)),
        }
    }

    /// Subscribe to connection events.
    ///
    /// The first subscription sees every event since creation; later ones
    /// start from the moment they subscribe.
    #[must_use]
    pub fn subscribe(&self) -> EventSubscription {
        let primed = self.first.lock().ok().and_then(|mut first| first.take());
        EventSubscription::new(primed.unwrap_or_else(|| self.events.subscribe()))
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Forward raw text to the peer.
    ///
    /// Text sent before the handshake completes goes out right after it.
    ///
    /// # Errors
    /// Returns `ChatError::ChannelClosed` if the socket task has finished.
    pub fn send(&self, text: impl Into<String>) -> Result<(), ChatError> {
        self.commands
            .send(Command::Send(text.into()))
            .map_err(|_| ChatError::ChannelClosed)
    }

    /// Close the socket. Closing twice is harmless.
    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }

    /// Close the socket and wait up to `grace` for the close frame to go out.
    ///
    /// Returns false if the socket task did not finish in time. Only the
    /// first call waits; later calls return true at once.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.close();
        let task = self.task.lock().ok().and_then(|mut task| task.take());
        match task {
            Some(task) => tokio::time::timeout(grace, task).await.is_ok(),
            None => true,
        }
    }
}

impl ChatSink for SocketService {
    fn send(&self, text: &str) -> Result<(), ChatError> {
        Self::send(self, text)
    }

    fn close(&self) {
        Self::close(self);
    }
}

async fn run_socket(
    url: String,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<SocketEvent>,
    state: watch::Sender<ConnectionState>,
) {
    tracing::info!(%url, "Connecting");

    let ws_stream = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            tracing::warn!(%url, "Connect failed: {e}");
            drop(commands);
            let _ = events.send(SocketEvent::Close);
            return;
        }
    };

    state.send_replace(ConnectionState::Open);
    tracing::info!(%url, "Websocket connection established");
    let _ = events.send(SocketEvent::Open);

    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(Command::Send(text)) => {
                    tracing::debug!(len = text.len(), "Sending frame");
                    if let Err(e) = ws_write.send(protocol::encode(text)).await {
                        tracing::warn!("WebSocket send failed: {e}");
                        break;
                    }
                }
                // Dropping the service counts as a close.
                Some(Command::Close) | None => {
                    tracing::debug!("Close requested");
                    break;
                }
            },
            frame = ws_read.next() => match frame {
                Some(Ok(msg)) => match protocol::decode(&msg) {
                    Inbound::Chat(chat) => {
                        tracing::debug!(len = chat.content.len(), "Received message");
                        let _ = events.send(SocketEvent::Message(chat));
                    }
                    Inbound::Closed => break,
                    Inbound::Skip => {}
                },
                Some(Err(e)) => {
                    tracing::error!("WebSocket error: {e}");
                    break;
                }
                None => break,
            },
        }
    }

    let _ = ws_write.close().await;
    // Sends fail from here on.
    drop(commands);
    state.send_replace(ConnectionState::Closed);
    tracing::info!(%url, "Websocket connection closed");
    let _ = events.send(SocketEvent::Close);
}
