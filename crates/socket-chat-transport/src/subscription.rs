//! Subscriber side of the adapter's event stream.

use futures::{StreamExt, future, stream::BoxStream};
use socket_chat_core::SocketEvent;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio_stream::wrappers::BroadcastStream;

/// A live view of the connection's events.
///
/// Lagging subscribers skip the events they missed.
pub struct EventSubscription {
    rx: broadcast::Receiver<SocketEvent>,
}

impl EventSubscription {
    /// Wrap a broadcast receiver.
    #[must_use]
    pub const fn new(rx: broadcast::Receiver<SocketEvent>) -> Self {
        Self { rx }
    }

    /// Next pending event, without waiting.
    pub fn try_next(&mut self) -> Option<SocketEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next event. Returns `None` once the adapter is gone.
    pub async fn next(&mut self) -> Option<SocketEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Convert into a stream of events.
    #[must_use]
    pub fn into_stream(self) -> BoxStream<'static, SocketEvent> {
        BroadcastStream::new(self.rx)
            .filter_map(|res| future::ready(res.ok()))
            .boxed()
    }
}

impl From<broadcast::Receiver<SocketEvent>> for EventSubscription {
    fn from(rx: broadcast::Receiver<SocketEvent>) -> Self {
        Self::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_next_drains_in_order() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = EventSubscription::new(rx);

        tx.send(SocketEvent::Open).unwrap();
        tx.send(SocketEvent::Close).unwrap();

        assert_eq!(sub.try_next(), Some(SocketEvent::Open));
        assert_eq!(sub.try_next(), Some(SocketEvent::Close));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_lag_skips_to_oldest_retained() {
        let (tx, rx) = broadcast::channel(1);
        let mut sub = EventSubscription::new(rx);

        tx.send(SocketEvent::Open).unwrap();
        tx.send(SocketEvent::Close).unwrap();

        assert_eq!(sub.try_next(), Some(SocketEvent::Close));
    }

    #[tokio::test]
    async fn test_stream_ends_with_sender() {
        let (tx, rx) = broadcast::channel(8);
        let stream = EventSubscription::new(rx).into_stream();

        tx.send(SocketEvent::Open).unwrap();
        drop(tx);

        let events: Vec<_> = stream.collect().await;
        assert_eq!(events, vec![SocketEvent::Open]);
    }
}
