//! Order aggregate, store boundary and lifecycle service.

mod aggregate;
mod memory;
mod service;
mod store;
mod value_objects;

pub use aggregate::Order;
pub use memory::InMemoryOrderStore;
pub use service::OrderService;
pub use store::OrderStore;
pub use value_objects::Item;

use common::{ItemId, Money, OrderId, OrderStatus};
use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order does not exist or has been deleted.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The item is not part of the order.
    #[error("Item {item_id} not found in order {order_id}")]
    ItemNotFound { order_id: OrderId, item_id: ItemId },

    /// Items can only change while the order is open.
    #[error("Invalid order status: cannot {action} on order {order_id} in {status} status")]
    InvalidOrderStatus {
        order_id: OrderId,
        status: OrderStatus,
        action: &'static str,
    },

    /// The status policy does not allow this transition.
    #[error("Invalid status transition for order {order_id}: {from} -> {to}")]
    InvalidStatusTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Item prices cannot be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },

    /// The order store failed.
    #[error("Failed to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl OrderError {
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| OrderError::Store { operation, source }
    }
}
