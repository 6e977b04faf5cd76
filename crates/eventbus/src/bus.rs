use tokio::sync::broadcast;

/// How a subscriber that falls behind the buffer should be treated.
///
/// `tokio::sync::broadcast`'s buffer is bounded: once a subscriber is more
/// than `capacity` events behind, the oldest unread events are dropped out
/// from under it. This policy controls what [`EventSubscriber::recv`]
/// reports when that happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackpressurePolicy {
    /// Skip silently past dropped events and return only the next event the
    /// subscriber can still see. Right for consumers that only care about
    /// current state (e.g. "is there a pending timeout right now").
    SkipToLatest,
    /// Surface the drop as [`RecvOutcome::Lagged`] with the number of events
    /// skipped, once, before resuming normal delivery. Right for consumers
    /// that need to know they missed something (e.g. metrics, audit).
    ReportLag,
}

/// A single `recv()` outcome under [`BackpressurePolicy::ReportLag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecvOutcome<T> {
    /// An event was delivered.
    Event(T),
    /// The subscriber lagged and this many events were dropped before the
    /// next one it could still see.
    Lagged(u64),
}

/// The bus was dropped (all senders gone) and no more events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event bus closed")]
pub struct RecvError;

/// Broadcast-based, generic event bus.
///
/// Emission never blocks and never fails loudly: with no subscribers
/// [`EventBus::emit`] is a no-op beyond the channel write.
pub struct EventBus<T> {
    sender: broadcast::Sender<T>,
    policy: BackpressurePolicy,
}

impl<T: Clone> EventBus<T> {
    /// Creates a bus with the given buffer size and backpressure policy.
    ///
    /// The buffer size is how many unconsumed events a subscriber can fall
    /// behind by before it starts lagging.
    #[must_use]
    pub fn new(buffer_size: usize, policy: BackpressurePolicy) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender, policy }
    }

    /// Emits an event to every current subscriber.
    ///
    /// Dropped silently if there are no subscribers.
    pub fn emit(&self, event: T) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to events published from this point on.
    #[must_use]
    pub fn subscribe(&self) -> EventSubscriber<T> {
        EventSubscriber { receiver: self.sender.subscribe(), policy: self.policy }
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Default for EventBus<T> {
    /// 1024-event buffer, skipping past lag rather than reporting it.
    fn default() -> Self {
        Self::new(1024, BackpressurePolicy::SkipToLatest)
    }
}

impl<T> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .field("policy", &self.policy)
            .finish()
    }
}

/// A receiver obtained from [`EventBus::subscribe`].
pub struct EventSubscriber<T> {
    receiver: broadcast::Receiver<T>,
    policy: BackpressurePolicy,
}

impl<T: Clone> EventSubscriber<T> {
    /// Waits for the next event.
    ///
    /// Under [`BackpressurePolicy::SkipToLatest`] this always resolves to an
    /// event (or [`RecvError`] once the bus is closed); lag is swallowed.
    /// Under [`BackpressurePolicy::ReportLag`] a lag is surfaced once as
    /// `Ok(RecvOutcome::Lagged(n))` before normal delivery resumes.
    pub async fn recv(&mut self) -> Result<RecvOutcome<T>, RecvError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Ok(RecvOutcome::Event(event)),
                Err(broadcast::error::RecvError::Closed) => return Err(RecvError),
                Err(broadcast::error::RecvError::Lagged(skipped)) => match self.policy {
                    BackpressurePolicy::SkipToLatest => continue,
                    BackpressurePolicy::ReportLag => return Ok(RecvOutcome::Lagged(skipped)),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bus_accepts_subscribers() {
        let bus: EventBus<u32> = EventBus::default();
        let _sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn emit_without_subscribers_does_not_panic() {
        let bus = EventBus::new(16, BackpressurePolicy::SkipToLatest);
        bus.emit("no one is listening");
    }

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = EventBus::new(16, BackpressurePolicy::SkipToLatest);
        let mut sub = bus.subscribe();

        bus.emit(42);

        assert_eq!(sub.recv().await.unwrap(), RecvOutcome::Event(42));
    }

    #[tokio::test]
    async fn multiple_subscribers_all_receive() {
        let bus = EventBus::new(16, BackpressurePolicy::SkipToLatest);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        bus.emit("cron_fired");

        assert_eq!(sub1.recv().await.unwrap(), RecvOutcome::Event("cron_fired"));
        assert_eq!(sub2.recv().await.unwrap(), RecvOutcome::Event("cron_fired"));
    }

    #[tokio::test]
    async fn closed_bus_reports_recv_error() {
        let bus = EventBus::<&str>::new(4, BackpressurePolicy::SkipToLatest);
        let mut sub = bus.subscribe();
        drop(bus);

        assert_eq!(sub.recv().await, Err(RecvError));
    }

    #[tokio::test]
    async fn skip_to_latest_swallows_lag_and_returns_next_event() {
        let bus = EventBus::new(2, BackpressurePolicy::SkipToLatest);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(i);
        }

        // Buffer holds only the last 2; SkipToLatest hides the lag entirely.
        assert_eq!(sub.recv().await.unwrap(), RecvOutcome::Event(3));
        assert_eq!(sub.recv().await.unwrap(), RecvOutcome::Event(4));
    }

    #[tokio::test]
    async fn report_lag_surfaces_skip_count_once() {
        let bus = EventBus::new(2, BackpressurePolicy::ReportLag);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(i);
        }

        match sub.recv().await.unwrap() {
            RecvOutcome::Lagged(skipped) => assert_eq!(skipped, 3),
            other => panic!("expected Lagged, got {other:?}"),
        }
        assert_eq!(sub.recv().await.unwrap(), RecvOutcome::Event(3));
        assert_eq!(sub.recv().await.unwrap(), RecvOutcome::Event(4));
    }
}
