use std::sync::Arc;

use async_trait::async_trait;

use crate::{DomainEvent, Result};

/// Boundary to whatever transport carries domain events out of the process.
///
/// Delivery is fire-and-forget from the caller's point of view: an `Err`
/// means the event was not accepted, and nothing more.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Hands an event to the transport.
    async fn dispatch(&self, event: DomainEvent) -> Result<()>;
}

#[async_trait]
impl<T: EventDispatcher + ?Sized> EventDispatcher for Arc<T> {
    async fn dispatch(&self, event: DomainEvent) -> Result<()> {
        (**self).dispatch(event).await
    }
}

/// Extension trait providing best-effort publishing on top of any dispatcher.
#[async_trait]
pub trait EventDispatcherExt: EventDispatcher {
    /// Dispatches an event, logging and counting a failure instead of returning it.
    ///
    /// Returns whether the dispatcher accepted the event.
    async fn publish(&self, event: DomainEvent) -> bool {
        let event_type = event.event_type();
        match self.dispatch(event).await {
            Ok(()) => {
                tracing::debug!(event_type, "event dispatched");
                true
            }
            Err(error) => {
                metrics::counter!("event_dispatch_failures_total", "event_type" => event_type)
                    .increment(1);
                tracing::warn!(event_type, %error, "event dispatch failed");
                false
            }
        }
    }
}

// Blanket implementation for all EventDispatcher implementations
impl<T: EventDispatcher + ?Sized> EventDispatcherExt for T {}
