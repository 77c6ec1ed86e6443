use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Sink for real-time notifications. Delivery is best-effort and never fails the caller.
pub trait Broadcaster: Send + Sync {
    /// Fan `event` out to every current subscriber; a no-op when nobody listens.
    fn publish(&self, event: ServerEvent);
}

/// Broadcast hub backing the public SSE stream.
#[derive(Clone)]
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Broadcaster for SseHub {
    fn publish(&self, event: ServerEvent) {
        // Err only means there are no receivers right now.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;

    fn event(name: &str) -> ServerEvent {
        ServerEvent::new(Some(name.to_string()), "{}".into())
    }

    #[test]
    fn publishing_without_subscribers_is_a_noop() {
        let hub = SseHub::new(4);
        hub.publish(event("photo-voting-started"));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let hub = SseHub::new(8);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.publish(event("qa-question-started"));
        hub.publish(event("qa-question-ended"));

        for receiver in [&mut first, &mut second] {
            assert_eq!(receiver.recv().await.unwrap().name(), "qa-question-started");
            assert_eq!(receiver.recv().await.unwrap().name(), "qa-question-ended");
        }
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_to_recent_events() {
        let hub = SseHub::new(2);
        let mut slow = hub.subscribe();
        for name in ["a", "b", "c", "d"] {
            hub.publish(event(name));
        }

        assert!(matches!(slow.recv().await, Err(RecvError::Lagged(2))));
        assert_eq!(slow.recv().await.unwrap().name(), "c");
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_affect_others() {
        let hub = SseHub::new(4);
        let gone = hub.subscribe();
        let mut kept = hub.subscribe();
        drop(gone);

        hub.publish(event("photo-vote-updated"));
        assert_eq!(kept.recv().await.unwrap().name(), "photo-vote-updated");
    }
}
