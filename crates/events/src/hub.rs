//! Subscriber registry and best-effort fan-out delivery.

use std::collections::HashMap;

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::feed::LiveEvent;

/// Outbound queue depth per subscriber. A subscriber that falls this far
/// behind is treated as failed and pruned rather than blocking the
/// broadcaster.
pub const SUBSCRIBER_BUFFER: usize = 64;

/// Registry of live subscriber connections with fan-out delivery.
///
/// Every subscriber owns a bounded mpsc queue drained by its connection's
/// writer task. Delivery is best-effort `try_send`: a closed or full queue
/// prunes the subscriber after the attempt and is never surfaced to the
/// broadcasting caller. There is no buffering or replay; a subscriber that
/// connects after an event has missed it permanently.
///
/// A single mutex guards the registry, so concurrent broadcasts are
/// serialized: all events pushed under one acquisition land adjacently in
/// each subscriber's queue. [`FeedHub::broadcast_pair`] relies on this to
/// keep a status event and its offline alert paired per subscriber.
///
/// Designed to be shared via `Arc<FeedHub>` across handlers and the
/// lifecycle monitor.
pub struct FeedHub {
    subscribers: Mutex<HashMap<Uuid, mpsc::Sender<LiveEvent>>>,
}

impl FeedHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new subscriber.
    ///
    /// Returns its id and the receiver half of the outbound queue; the
    /// caller forwards received events to the underlying connection.
    pub async fn connect(&self) -> (Uuid, mpsc::Receiver<LiveEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.subscribers.lock().await.insert(id, tx);
        (id, rx)
    }

    /// Deregister a subscriber. Safe to call for an id that was already
    /// pruned by a failed delivery.
    pub async fn disconnect(&self, id: Uuid) {
        self.subscribers.lock().await.remove(&id);
    }

    /// Deliver an event to every registered subscriber.
    pub async fn broadcast(&self, event: LiveEvent) {
        self.broadcast_all(&[event]).await;
    }

    /// Deliver two events to every subscriber as an adjacent pair.
    ///
    /// Used by the lifecycle monitor so a `device_status` event is
    /// immediately followed by its `device_offline` alert in every
    /// subscriber's feed, even while ingestion broadcasts concurrently.
    pub async fn broadcast_pair(&self, first: LiveEvent, second: LiveEvent) {
        self.broadcast_all(&[first, second]).await;
    }

    /// Deliver events in order under one registry acquisition, pruning any
    /// subscriber whose queue is closed or full.
    async fn broadcast_all(&self, events: &[LiveEvent]) {
        let mut subscribers = self.subscribers.lock().await;
        let mut failed: Vec<Uuid> = Vec::new();

        for (id, tx) in subscribers.iter() {
            for event in events {
                if tx.try_send(event.clone()).is_err() {
                    failed.push(*id);
                    break;
                }
            }
        }

        for id in failed {
            subscribers.remove(&id);
            tracing::warn!(subscriber = %id, "Pruned live subscriber after failed delivery");
        }
    }

    /// Deliver an event to one subscriber (ping/pong replies).
    pub async fn send_to(&self, id: Uuid, event: LiveEvent) {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(tx) = subscribers.get(&id) {
            if tx.try_send(event).is_err() {
                subscribers.remove(&id);
                tracing::warn!(subscriber = %id, "Pruned live subscriber after failed delivery");
            }
        }
    }

    /// The current number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Drop every subscriber, closing their queues.
    ///
    /// Used during graceful shutdown; each connection's writer task observes
    /// its queue closing and terminates.
    pub async fn shutdown_all(&self) {
        let mut subscribers = self.subscribers.lock().await;
        let count = subscribers.len();
        subscribers.clear();
        tracing::info!(count, "Closed all live-feed subscriptions");
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let hub = FeedHub::new();
        let (_a, mut rx_a) = hub.connect().await;
        let (_b, mut rx_b) = hub.connect().await;

        hub.broadcast(LiveEvent::pong()).await;

        assert!(matches!(rx_a.recv().await, Some(LiveEvent::Pong { .. })));
        assert!(matches!(rx_b.recv().await, Some(LiveEvent::Pong { .. })));
    }

    #[tokio::test]
    async fn failed_subscriber_is_pruned_and_others_still_receive() {
        let hub = FeedHub::new();
        let (_a, mut rx_a) = hub.connect().await;
        let (_b, rx_b) = hub.connect().await;
        let (_c, mut rx_c) = hub.connect().await;

        // Dropping the receiver closes the queue; the next delivery fails.
        drop(rx_b);
        hub.broadcast(LiveEvent::pong()).await;

        assert!(matches!(rx_a.recv().await, Some(LiveEvent::Pong { .. })));
        assert!(matches!(rx_c.recv().await, Some(LiveEvent::Pong { .. })));
        assert_eq!(hub.subscriber_count().await, 2);

        // The pruned subscriber is not attempted again.
        hub.broadcast(LiveEvent::pong()).await;
        assert_eq!(hub.subscriber_count().await, 2);
    }

    #[tokio::test]
    async fn slow_subscriber_is_disconnected_on_overflow() {
        let hub = FeedHub::new();
        let (_id, _rx) = hub.connect().await;

        // Fill the queue past capacity without draining it.
        for _ in 0..=SUBSCRIBER_BUFFER {
            hub.broadcast(LiveEvent::pong()).await;
        }

        assert_eq!(hub.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn pair_arrives_adjacent_and_in_order() {
        let hub = FeedHub::new();
        let (_id, mut rx) = hub.connect().await;

        let status = LiveEvent::device_status(
            "BED_A_01",
            wardsight_core::device::DeviceStatus::Offline,
        );
        hub.broadcast_pair(
            status,
            LiveEvent::Alert {
                device_id: "BED_A_01".to_string(),
                alert_type: "device_offline".to_string(),
                severity: "high".to_string(),
                message: "Device BED_A_01 went offline".to_string(),
                timestamp: chrono::Utc::now(),
            },
        )
        .await;

        assert!(matches!(
            rx.recv().await,
            Some(LiveEvent::DeviceStatus { .. })
        ));
        assert!(matches!(rx.recv().await, Some(LiveEvent::Alert { .. })));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let hub = FeedHub::new();
        let (id, _rx) = hub.connect().await;

        hub.disconnect(id).await;
        hub.disconnect(id).await;
        assert_eq!(hub.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn send_to_targets_a_single_subscriber() {
        let hub = FeedHub::new();
        let (a, mut rx_a) = hub.connect().await;
        let (_b, mut rx_b) = hub.connect().await;

        hub.send_to(a, LiveEvent::pong()).await;

        assert!(matches!(rx_a.recv().await, Some(LiveEvent::Pong { .. })));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let hub = FeedHub::new();
        hub.broadcast(LiveEvent::pong()).await;

        let (_id, mut rx) = hub.connect().await;
        assert!(rx.try_recv().is_err());
    }
}
