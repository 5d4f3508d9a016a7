//! The domain event catalog.

use common::{
    CustomerId, ItemId, Money, NotificationId, OrderId, OrderStatus, TransactionId, UserId,
};
use serde::{Deserialize, Serialize};

/// Reason reported in [`PaymentFailedData`] when the balance cannot cover a payment.
pub const REASON_INSUFFICIENT_FUNDS: &str = "InsufficientFunds";

/// Every event the order, payment and notification services publish.
///
/// The set is closed: consumers match on the variant instead of inspecting
/// a type string at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainEvent {
    OrderCreated(OrderCreatedData),
    OrderStatusChanged(OrderStatusChangedData),
    OrderItemChanged(OrderItemChangedData),
    OrderItemRemoved(OrderItemRemovedData),
    OrderRemoved(OrderRemovedData),
    PaymentSucceeded(PaymentSucceededData),
    PaymentFailed(PaymentFailedData),

    /// Produced by the notification service, listed so consumers share one catalog.
    NotificationSent(NotificationSentData),
    NotificationFailed(NotificationFailedData),
}

impl DomainEvent {
    /// Returns the event type tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::OrderCreated(_) => "OrderCreated",
            DomainEvent::OrderStatusChanged(_) => "OrderStatusChanged",
            DomainEvent::OrderItemChanged(_) => "OrderItemChanged",
            DomainEvent::OrderItemRemoved(_) => "OrderItemRemoved",
            DomainEvent::OrderRemoved(_) => "OrderRemoved",
            DomainEvent::PaymentSucceeded(_) => "PaymentSucceeded",
            DomainEvent::PaymentFailed(_) => "PaymentFailed",
            DomainEvent::NotificationSent(_) => "NotificationSent",
            DomainEvent::NotificationFailed(_) => "NotificationFailed",
        }
    }

    /// Returns the order this event concerns, if any.
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            DomainEvent::OrderCreated(data) => Some(data.order_id),
            DomainEvent::OrderStatusChanged(data) => Some(data.order_id),
            DomainEvent::OrderItemChanged(data) => Some(data.order_id),
            DomainEvent::OrderItemRemoved(data) => Some(data.order_id),
            DomainEvent::OrderRemoved(data) => Some(data.order_id),
            DomainEvent::PaymentSucceeded(data) => Some(data.order_id),
            DomainEvent::PaymentFailed(data) => Some(data.order_id),
            DomainEvent::NotificationSent(_) | DomainEvent::NotificationFailed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedData {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedData {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Data for OrderItemChanged event.
///
/// `removed_items` is part of the wire shape even though item removal is
/// published separately as [`DomainEvent::OrderItemRemoved`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemChangedData {
    pub order_id: OrderId,
    pub added_items: Vec<ItemId>,
    pub removed_items: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRemovedData {
    pub order_id: OrderId,
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRemovedData {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSucceededData {
    pub transaction_id: TransactionId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFailedData {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSentData {
    pub notification_id: NotificationId,
    pub user_id: UserId,
    pub channel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFailedData {
    pub user_id: UserId,
    pub channel: String,
    pub reason: String,
}

// Convenience constructors for events
impl DomainEvent {
    pub fn order_created(order_id: OrderId, customer_id: CustomerId) -> Self {
        DomainEvent::OrderCreated(OrderCreatedData {
            order_id,
            customer_id,
        })
    }

    pub fn order_status_changed(order_id: OrderId, status: OrderStatus) -> Self {
        DomainEvent::OrderStatusChanged(OrderStatusChangedData { order_id, status })
    }

    /// Creates an OrderItemChanged event announcing a single added item.
    pub fn order_item_added(order_id: OrderId, item_id: ItemId) -> Self {
        DomainEvent::OrderItemChanged(OrderItemChangedData {
            order_id,
            added_items: vec![item_id],
            removed_items: Vec::new(),
        })
    }

    pub fn order_item_removed(order_id: OrderId, item_id: ItemId) -> Self {
        DomainEvent::OrderItemRemoved(OrderItemRemovedData { order_id, item_id })
    }

    pub fn order_removed(order_id: OrderId) -> Self {
        DomainEvent::OrderRemoved(OrderRemovedData { order_id })
    }

    pub fn payment_succeeded(
        transaction_id: TransactionId,
        order_id: OrderId,
        user_id: UserId,
        amount: Money,
    ) -> Self {
        DomainEvent::PaymentSucceeded(PaymentSucceededData {
            transaction_id,
            order_id,
            user_id,
            amount,
        })
    }

    pub fn payment_failed(order_id: OrderId, user_id: UserId, reason: impl Into<String>) -> Self {
        DomainEvent::PaymentFailed(PaymentFailedData {
            order_id,
            user_id,
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let order_id = OrderId::new();

        let event = DomainEvent::order_created(order_id, CustomerId::new());
        assert_eq!(event.event_type(), "OrderCreated");

        let event = DomainEvent::order_status_changed(order_id, OrderStatus::Paid);
        assert_eq!(event.event_type(), "OrderStatusChanged");

        let event = DomainEvent::order_item_added(order_id, ItemId::new());
        assert_eq!(event.event_type(), "OrderItemChanged");

        let event = DomainEvent::order_item_removed(order_id, ItemId::new());
        assert_eq!(event.event_type(), "OrderItemRemoved");

        let event = DomainEvent::order_removed(order_id);
        assert_eq!(event.event_type(), "OrderRemoved");

        let event = DomainEvent::payment_succeeded(
            TransactionId::new(),
            order_id,
            UserId::new(),
            Money::from_units(75),
        );
        assert_eq!(event.event_type(), "PaymentSucceeded");

        let event = DomainEvent::payment_failed(order_id, UserId::new(), REASON_INSUFFICIENT_FUNDS);
        assert_eq!(event.event_type(), "PaymentFailed");
    }

    #[test]
    fn test_order_id_accessor() {
        let order_id = OrderId::new();
        assert_eq!(
            DomainEvent::order_removed(order_id).order_id(),
            Some(order_id)
        );

        let event = DomainEvent::NotificationSent(NotificationSentData {
            notification_id: NotificationId::new(),
            user_id: UserId::new(),
            channel: "email".to_string(),
        });
        assert_eq!(event.order_id(), None);
    }

    #[test]
    fn test_item_added_has_no_removed_items() {
        let item_id = ItemId::new();
        let DomainEvent::OrderItemChanged(data) =
            DomainEvent::order_item_added(OrderId::new(), item_id)
        else {
            panic!("Expected OrderItemChanged event");
        };
        assert_eq!(data.added_items, vec![item_id]);
        assert!(data.removed_items.is_empty());
    }

    #[test]
    fn test_serialization_uses_type_tag() {
        let order_id = OrderId::new();
        let event = DomainEvent::order_status_changed(order_id, OrderStatus::Pending);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "OrderStatusChanged");
        assert_eq!(json["data"]["status"], "Pending");
        assert_eq!(json["data"]["order_id"], order_id.to_string());
    }

    #[test]
    fn test_payment_failed_deserialization() {
        let order_id = OrderId::new();
        let user_id = UserId::new();
        let json = serde_json::json!({
            "type": "PaymentFailed",
            "data": {
                "order_id": order_id,
                "user_id": user_id,
                "reason": "InsufficientFunds",
            }
        });

        let event: DomainEvent = serde_json::from_value(json).unwrap();
        assert_eq!(
            event,
            DomainEvent::payment_failed(order_id, user_id, REASON_INSUFFICIENT_FUNDS)
        );
    }
}
