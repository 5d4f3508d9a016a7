use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderId;
use uuid::Uuid;

use crate::error::StoreResult;

use super::Order;

/// Persistence boundary for orders and their items.
///
/// Implementations must give read-before-write consistency per order:
/// `store` rejects a write whose version no longer matches the stored one.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Allocates a fresh identity for an order or an item.
    async fn next_id(&self) -> StoreResult<Uuid>;

    /// Inserts a new order (version 0) or updates an existing one.
    ///
    /// Fails with `DuplicateKey` if a different order already holds the id.
    /// Updates fail with `Conflict` if the stored version differs from
    /// `order.version()`, and with `NotFound` if the order was deleted.
    /// A successful update bumps the stored version.
    async fn store(&self, order: &Order) -> StoreResult<()>;

    /// Finds a live order. Soft-deleted orders are reported as `None`.
    async fn find(&self, id: OrderId) -> StoreResult<Option<Order>>;

    /// Soft-deletes an order by stamping `deleted_at`.
    ///
    /// Fails with `NotFound` if the order is absent or already deleted.
    async fn delete(&self, id: OrderId, deleted_at: DateTime<Utc>) -> StoreResult<()>;
}
