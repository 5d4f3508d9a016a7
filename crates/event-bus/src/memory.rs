use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{DispatchError, DomainEvent, EventDispatcher, EventEnvelope, Result};

/// In-memory dispatcher that records every accepted event.
///
/// Clones share the same log, so a test can hand one clone to a service and
/// inspect the other.
#[derive(Clone, Default)]
pub struct InMemoryEventDispatcher {
    envelopes: Arc<RwLock<Vec<EventEnvelope>>>,
    fail_on_dispatch: Arc<AtomicBool>,
}

impl InMemoryEventDispatcher {
    /// Creates a new empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent dispatch fail with a transport error.
    pub fn set_fail_on_dispatch(&self, fail: bool) {
        self.fail_on_dispatch.store(fail, Ordering::SeqCst);
    }

    /// Returns the recorded events in dispatch order.
    pub async fn events(&self) -> Vec<DomainEvent> {
        self.envelopes
            .read()
            .await
            .iter()
            .map(|e| e.payload.clone())
            .collect()
    }

    /// Returns the recorded events with the given type tag.
    pub async fn events_of_type(&self, event_type: &str) -> Vec<DomainEvent> {
        self.envelopes
            .read()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .map(|e| e.payload.clone())
            .collect()
    }

    /// Returns the most recently recorded event.
    pub async fn last_event(&self) -> Option<DomainEvent> {
        self.envelopes
            .read()
            .await
            .last()
            .map(|e| e.payload.clone())
    }

    /// Returns the total number of events recorded.
    pub async fn event_count(&self) -> usize {
        self.envelopes.read().await.len()
    }

    /// Clears the recorded events.
    pub async fn clear(&self) {
        self.envelopes.write().await.clear();
    }
}

#[async_trait]
impl EventDispatcher for InMemoryEventDispatcher {
    async fn dispatch(&self, event: DomainEvent) -> Result<()> {
        if self.fail_on_dispatch.load(Ordering::SeqCst) {
            return Err(DispatchError::Transport(format!(
                "dispatcher rejected {}",
                event.event_type()
            )));
        }

        self.envelopes.write().await.push(EventEnvelope::new(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CustomerId, OrderId, OrderStatus};

    #[tokio::test]
    async fn records_events_in_order() {
        let dispatcher = InMemoryEventDispatcher::new();
        let order_id = OrderId::new();

        dispatcher
            .dispatch(DomainEvent::order_created(order_id, CustomerId::new()))
            .await
            .unwrap();
        dispatcher
            .dispatch(DomainEvent::order_status_changed(order_id, OrderStatus::Pending))
            .await
            .unwrap();

        let types: Vec<_> = dispatcher
            .events()
            .await
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(types, vec!["OrderCreated", "OrderStatusChanged"]);
        assert_eq!(
            dispatcher.last_event().await,
            Some(DomainEvent::order_status_changed(order_id, OrderStatus::Pending))
        );
    }

    #[tokio::test]
    async fn filters_by_type() {
        let dispatcher = InMemoryEventDispatcher::new();
        let order_id = OrderId::new();

        dispatcher
            .dispatch(DomainEvent::order_created(order_id, CustomerId::new()))
            .await
            .unwrap();
        dispatcher
            .dispatch(DomainEvent::order_removed(order_id))
            .await
            .unwrap();

        assert_eq!(dispatcher.events_of_type("OrderRemoved").await.len(), 1);
        assert!(dispatcher.events_of_type("PaymentFailed").await.is_empty());
    }

    #[tokio::test]
    async fn failing_dispatcher_records_nothing() {
        let dispatcher = InMemoryEventDispatcher::new();
        dispatcher.set_fail_on_dispatch(true);

        let result = dispatcher
            .dispatch(DomainEvent::order_removed(OrderId::new()))
            .await;

        assert!(matches!(result, Err(DispatchError::Transport(_))));
        assert_eq!(dispatcher.event_count().await, 0);

        dispatcher.set_fail_on_dispatch(false);
        dispatcher
            .dispatch(DomainEvent::order_removed(OrderId::new()))
            .await
            .unwrap();
        assert_eq!(dispatcher.event_count().await, 1);
    }

    #[tokio::test]
    async fn clones_share_the_log() {
        let dispatcher = InMemoryEventDispatcher::new();
        let clone = dispatcher.clone();

        clone
            .dispatch(DomainEvent::order_removed(OrderId::new()))
            .await
            .unwrap();
        assert_eq!(dispatcher.event_count().await, 1);

        dispatcher.clear().await;
        assert_eq!(clone.event_count().await, 0);
    }
}
