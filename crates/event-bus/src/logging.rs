use async_trait::async_trait;

use crate::{DomainEvent, EventDispatcher, EventEnvelope, Result};

/// Dispatcher that writes each event to the tracing pipeline as structured JSON.
///
/// Useful as the default sink when no broker is wired in.
#[derive(Debug, Clone, Default)]
pub struct TracingEventDispatcher {
    target: Option<&'static str>,
}

impl TracingEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every log line with a logical destination name.
    pub fn with_target(target: &'static str) -> Self {
        Self {
            target: Some(target),
        }
    }
}

#[async_trait]
impl EventDispatcher for TracingEventDispatcher {
    async fn dispatch(&self, event: DomainEvent) -> Result<()> {
        let envelope = EventEnvelope::new(event);
        let payload = serde_json::to_string(&envelope.payload)?;

        tracing::info!(
            destination = self.target.unwrap_or("events"),
            event_id = %envelope.event_id,
            event_type = %envelope.event_type,
            %payload,
            "domain event"
        );
        Ok(())
    }
}
