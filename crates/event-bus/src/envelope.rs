use chrono::{DateTime, Utc};
use common::EventId;
use serde::{Deserialize, Serialize};

use crate::DomainEvent;

/// A dispatched event along with its transport metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique identifier for this dispatch.
    pub event_id: EventId,

    /// The event type tag (e.g., "OrderCreated", "PaymentFailed").
    pub event_type: String,

    /// When the event was handed to the dispatcher.
    pub timestamp: DateTime<Utc>,

    /// The event itself.
    pub payload: DomainEvent,
}

impl EventEnvelope {
    /// Wraps an event with a fresh id and the current time.
    pub fn new(event: DomainEvent) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event.event_type().to_string(),
            timestamp: Utc::now(),
            payload: event,
        }
    }
}
