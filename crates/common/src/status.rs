//! Order status values.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// ```text
/// Open ──► Pending ──► Paid
///   │         │
///   └─────────┴──────► Cancelled
/// ```
///
/// Soft deletion is tracked separately and is allowed from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order accepts item changes.
    #[default]
    Open,

    /// Order is checked out and awaits payment.
    Pending,

    /// Payment has settled (terminal).
    Paid,

    /// Order was abandoned (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if items can be added or removed in this status.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, OrderStatus::Open)
    }

    /// Returns true if `next` is on the allow-list of transitions from this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Open, OrderStatus::Pending)
                | (OrderStatus::Open, OrderStatus::Cancelled)
                | (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "Open",
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
