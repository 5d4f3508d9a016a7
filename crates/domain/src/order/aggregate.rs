//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CustomerId, ItemId, Money, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::config::StatusPolicy;

use super::{Item, OrderError};

/// Order aggregate root.
///
/// Owns its items and its status. Deletion is a tombstone timestamp kept
/// apart from the status, so an order in any status can be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,

    /// Store version for optimistic concurrency; 0 until first update.
    #[serde(default)]
    version: u64,

    customer_id: CustomerId,

    status: OrderStatus,

    /// Items in insertion order.
    items: Vec<Item>,

    /// Set when the order is soft-deleted.
    deleted_at: Option<DateTime<Utc>>,

    created_at: DateTime<Utc>,

    updated_at: DateTime<Utc>,
}

// Query methods
impl Order {
    /// Creates a new open order with no items.
    pub fn new(id: OrderId, customer_id: CustomerId) -> Self {
        let now = Utc::now();
        Self {
            id,
            version: 0,
            customer_id,
            status: OrderStatus::Open,
            items: Vec::new(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the items in the order they were added.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns an item by ID.
    pub fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the sum of all item prices, or `None` if it does not fit in
    /// a `Money`.
    pub fn total(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |total, item| total.checked_add(item.price))
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

// Command methods
impl Order {
    /// Checks that an item with this price may be added right now.
    pub fn validate_new_item(&self, price: Money) -> Result<(), OrderError> {
        self.ensure_items_modifiable("add item")?;

        if price.is_negative() {
            return Err(OrderError::InvalidPrice { price });
        }

        Ok(())
    }

    /// Appends an item.
    pub fn add_item(&mut self, item: Item) -> Result<(), OrderError> {
        self.validate_new_item(item.price)?;

        self.items.push(item);
        self.touch();
        Ok(())
    }

    /// Removes an item, returning it.
    pub fn remove_item(&mut self, item_id: ItemId) -> Result<Item, OrderError> {
        self.ensure_items_modifiable("remove item")?;

        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(OrderError::ItemNotFound {
                order_id: self.id,
                item_id,
            })?;

        let removed = self.items.remove(position);
        self.touch();
        Ok(removed)
    }

    /// Moves the order to `next` if `policy` allows it.
    ///
    /// Returns `false` without touching the order when it already has that
    /// status.
    pub fn change_status(
        &mut self,
        next: OrderStatus,
        policy: StatusPolicy,
    ) -> Result<bool, OrderError> {
        if self.status == next {
            return Ok(false);
        }

        if !policy.allows(self.status, next) {
            return Err(OrderError::InvalidStatusTransition {
                order_id: self.id,
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.touch();
        Ok(true)
    }

    fn ensure_items_modifiable(&self, action: &'static str) -> Result<(), OrderError> {
        if self.status.can_modify_items() {
            Ok(())
        } else {
            Err(OrderError::InvalidOrderStatus {
                order_id: self.id,
                status: self.status,
                action,
            })
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub(crate) fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}
