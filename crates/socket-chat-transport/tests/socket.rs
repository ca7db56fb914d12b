//! Adapter tests against a local WebSocket peer.

use std::time::Duration;

use axum::{
    Router,
    extract::{
        WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    routing::get,
};
use socket_chat_core::{ChatConfig, ChatError, ChatMessage, SocketEvent};
use socket_chat_transport::{ChatView, EventSubscription, SocketService};
use tokio_test::assert_ok;

const WAIT: Duration = Duration::from_secs(5);

fn chat_frame(sender: &str, content: &str) -> Message {
    let json = serde_json::json!({ "sender": sender, "content": content });
    Message::Text(json.to_string().into())
}

/// Greets, echoes text back as `echo`, and closes on "bye".
async fn relay(mut socket: WebSocket) {
    if socket.send(chat_frame("server", "welcome")).await.is_err() {
        return;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) if text.as_str() == "bye" => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            Message::Text(text) if text.as_str() == "garbage" => {
                let _ = socket.send(Message::Text("{not json".into())).await;
            }
            Message::Text(text) => {
                let _ = socket.send(chat_frame("echo", text.as_str())).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

async fn start_peer() -> ChatConfig {
    let app = Router::new().route(
        "/ws",
        get(|ws: WebSocketUpgrade| async move { ws.on_upgrade(relay) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ChatConfig::new(format!("ws://{addr}/ws"))
}

async fn next(sub: &mut EventSubscription) -> SocketEvent {
    tokio::time::timeout(WAIT, sub.next())
        .await
        .expect("timed out waiting for event")
        .expect("event stream ended")
}

#[tokio::test]
async fn test_open_message_close_sequence() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    let mut events = service.subscribe();

    assert_eq!(next(&mut events).await, SocketEvent::Open);
    assert!(service.state().is_open());
    assert_eq!(
        next(&mut events).await,
        SocketEvent::Message(ChatMessage::new("welcome").with_sender("server"))
    );

    assert_ok!(service.send("hello"));
    let SocketEvent::Message(echo) = next(&mut events).await else {
        panic!("Wrong event type");
    };
    assert_eq!(echo.display_line(), "echo: hello");

    service.close();
    assert_eq!(next(&mut events).await, SocketEvent::Close);
    assert!(!service.state().is_open());
    assert_eq!(events.try_next(), None);
}

#[tokio::test]
async fn test_send_before_open_is_delivered() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    assert_ok!(service.send("early"));

    let mut events = service.subscribe();
    let mut lines = Vec::new();
    while lines.len() < 3 {
        lines.push(next(&mut events).await.display_line());
    }
    assert!(lines.contains(&"echo: early".to_string()));
}

#[tokio::test]
async fn test_connect_failure_emits_single_close() {
    // Grab a free port, then release it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = SocketService::connect(&ChatConfig::new(format!("ws://{addr}/ws")));
    let mut events = service.subscribe();

    assert_eq!(next(&mut events).await, SocketEvent::Close);
    assert_eq!(events.try_next(), None);
    assert!(matches!(service.send("late"), Err(ChatError::ChannelClosed)));
}

#[tokio::test]
async fn test_malformed_frame_is_dropped() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    let mut events = service.subscribe();

    assert_eq!(next(&mut events).await, SocketEvent::Open);
    next(&mut events).await; // welcome

    assert_ok!(service.send("garbage"));
    assert_ok!(service.send("after"));

    let SocketEvent::Message(msg) = next(&mut events).await else {
        panic!("Malformed frame should not end the connection");
    };
    assert_eq!(msg.content, "after");
}

#[tokio::test]
async fn test_peer_close_ends_connection() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    let mut events = service.subscribe();

    assert_eq!(next(&mut events).await, SocketEvent::Open);
    assert_ok!(service.send("bye"));

    loop {
        if next(&mut events).await == SocketEvent::Close {
            break;
        }
    }
    assert!(matches!(service.send("anyone?"), Err(ChatError::ChannelClosed)));
}

#[tokio::test]
async fn test_late_subscriber_sees_later_events() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    let mut first = service.subscribe();
    assert_eq!(next(&mut first).await, SocketEvent::Open);

    let mut second = service.subscribe();
    assert_ok!(service.send("both"));

    for sub in [&mut first, &mut second] {
        loop {
            if let SocketEvent::Message(msg) = next(sub).await {
                if msg.content == "both" {
                    break;
                }
            }
        }
    }
}

#[tokio::test]
async fn test_shutdown_waits_for_socket_task() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    let mut events = service.subscribe();
    assert_eq!(next(&mut events).await, SocketEvent::Open);

    assert!(service.shutdown(WAIT).await);

    // The task has finished, so its final events are already queued.
    assert!(!service.state().is_open());
    assert!(matches!(service.send("gone"), Err(ChatError::ChannelClosed)));
    let mut last = None;
    while let Some(event) = events.try_next() {
        last = Some(event);
    }
    assert_eq!(last, Some(SocketEvent::Close));

    // Only the first call waits.
    assert!(service.shutdown(WAIT).await);
}

#[tokio::test]
async fn test_view_over_live_socket() {
    let config = start_peer().await;
    let service = SocketService::connect(&config);
    let events = service.subscribe();
    let mut view = ChatView::new(service, events);

    view.set_input("/shout");
    assert!(view.send().unwrap());

    let deadline = tokio::time::Instant::now() + WAIT;
    while !view.log().lines().iter().any(|l| l == "echo: /shout") {
        assert!(tokio::time::Instant::now() < deadline, "no echo in {:?}", view.log());
        view.poll_events();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(view.log().lines()[0], "User has connected to the channel");
    assert!(view.state().is_open());
}
