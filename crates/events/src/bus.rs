//! Event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for
//! [`StreamEvent`]s decoded off the wire. It is designed to be shared
//! via `Arc<EventBus>` (the stream hub owns one); subscribing returns
//! an independent receiver, and dropping the receiver unsubscribes.

use tokio::sync::broadcast;
use vidflow_core::StreamEvent;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for stream events.
///
/// When the buffer is full, the oldest un-consumed events are dropped
/// and slow receivers observe `RecvError::Lagged`; the authoritative
/// state is always re-fetchable over REST.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StreamEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; there is
    /// nothing to notify.
    pub fn publish(&self, event: StreamEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::trace!(event = ?e.0, "No subscribers for stream event");
        }
    }

    /// Subscribe to every event published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidflow_core::execution::{LogData, NodeLifecycleData};

    fn log_event(message: &str) -> StreamEvent {
        StreamEvent::Log(LogData {
            message: message.to_string(),
            timestamp: None,
            level: "info".to_string(),
            node_id: None,
        })
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(log_event("hello"));

        let received = rx.recv().await.expect("should receive the event");
        match received {
            StreamEvent::Log(d) => assert_eq!(d.message, "hello"),
            other => panic!("expected Log, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(StreamEvent::NodeStarted(NodeLifecycleData {
            node_id: "n1".to_string(),
            node_type: Some("scan".to_string()),
        }));

        for rx in [&mut rx1, &mut rx2] {
            let event = rx.recv().await.expect("each subscriber should receive");
            assert!(matches!(event, StreamEvent::NodeStarted(_)));
        }
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(log_event("orphan"));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_unsubscribes() {
        let bus = EventBus::default();
        let rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);
        drop(rx);
        assert_eq!(bus.receiver_count(), 0);
    }
}
