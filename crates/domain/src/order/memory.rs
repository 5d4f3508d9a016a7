use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderId;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

use super::{Order, OrderStore};

const ENTITY: &str = "Order";

/// In-memory order store for tests and single-process use.
///
/// Deleted orders stay in the map with their tombstone set.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a backend error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored record, including soft-deleted ones.
    pub async fn find_any(&self, id: OrderId) -> Option<Order> {
        self.orders.read().await.get(&id).cloned()
    }

    /// Returns the number of records, including soft-deleted ones.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("order store unavailable".to_string()));
        }
        Ok(())
    }
}

fn is_same_order(stored: &Order, incoming: &Order) -> bool {
    stored.customer_id() == incoming.customer_id() && stored.created_at() == incoming.created_at()
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn next_id(&self) -> StoreResult<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn store(&self, order: &Order) -> StoreResult<()> {
        self.check_writable()?;

        let mut orders = self.orders.write().await;
        let id = order.id();

        let existing = orders.get(&id).map(|stored| {
            (
                is_same_order(stored, order),
                stored.is_deleted(),
                stored.version(),
            )
        });

        match existing {
            None if order.version() == 0 => {
                orders.insert(id, order.clone());
            }
            // a different order already holds this id
            Some((false, _, _)) => {
                return Err(StoreError::duplicate_key(ENTITY, id));
            }
            Some((true, true, _)) => {
                return Err(StoreError::not_found(ENTITY, id));
            }
            Some((true, false, actual)) if actual == order.version() => {
                let mut updated = order.clone();
                updated.set_version(actual + 1);
                orders.insert(id, updated);
            }
            other => {
                return Err(StoreError::Conflict {
                    entity: ENTITY,
                    id: id.to_string(),
                    expected: order.version(),
                    actual: other.map_or(0, |(_, _, version)| version),
                });
            }
        }

        Ok(())
    }

    async fn find(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).filter(|order| !order.is_deleted()).cloned())
    }

    async fn delete(&self, id: OrderId, deleted_at: DateTime<Utc>) -> StoreResult<()> {
        self.check_writable()?;

        let mut orders = self.orders.write().await;
        match orders.get_mut(&id) {
            Some(order) if !order.is_deleted() => {
                order.mark_deleted(deleted_at);
                order.set_version(order.version() + 1);
                Ok(())
            }
            _ => Err(StoreError::not_found(ENTITY, id)),
        }
    }
}
