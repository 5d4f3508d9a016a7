pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod event;
pub mod logging;
pub mod memory;

pub use dispatcher::{EventDispatcher, EventDispatcherExt};
pub use envelope::EventEnvelope;
pub use error::{DispatchError, Result};
pub use event::{
    DomainEvent, NotificationFailedData, NotificationSentData, OrderCreatedData,
    OrderItemChangedData, OrderItemRemovedData, OrderRemovedData, OrderStatusChangedData,
    PaymentFailedData, PaymentSucceededData, REASON_INSUFFICIENT_FUNDS,
};
pub use logging::TracingEventDispatcher;
pub use memory::InMemoryEventDispatcher;
