//! Broadcast event bus.
//!
//! Hosts that want event-style notification subscribe here; producers emit
//! without knowing whether anyone listens.

use tokio::sync::broadcast;

/// Default number of undelivered events a slow subscriber may lag behind.
pub const DEFAULT_CAPACITY: usize = 64;

/// Multi-subscriber event channel.
#[derive(Debug, Clone)]
pub struct EventBus<E> {
    tx: broadcast::Sender<E>,
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<E: Clone> EventBus<E> {
    /// Create a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event to every current subscriber.
    ///
    /// Returns the number of subscribers that received it. Emitting with no
    /// subscribers is not an error.
    pub fn emit(&self, event: E) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                tracing::trace!("Event dropped, no subscribers");
                0
            }
        }
    }

    /// Subscribe to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_is_dropped() {
        let bus: EventBus<u32> = EventBus::default();
        assert_eq!(bus.emit(1), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn every_subscriber_sees_the_event() {
        let bus = EventBus::new(4);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.emit("success"), 2);

        tokio_test::block_on(async {
            assert_eq!(a.recv().await.unwrap(), "success");
            assert_eq!(b.recv().await.unwrap(), "success");
        });
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new(4);
        let _early = bus.subscribe();
        bus.emit(1);

        let mut late = bus.subscribe();
        bus.emit(2);

        assert_eq!(late.try_recv().unwrap(), 2);
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        bus.emit('x');
        assert_eq!(rx.try_recv().unwrap(), 'x');
    }
}
