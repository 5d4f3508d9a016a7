//! Shared value types for the order and payment services.

pub mod money;
pub mod status;
pub mod types;

pub use money::Money;
pub use status::OrderStatus;
pub use types::{
    AccountId, CustomerId, EventId, ItemId, NotificationId, OrderId, ProductId, TransactionId,
    UserId,
};
