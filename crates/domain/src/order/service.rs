//! Order lifecycle service.

use chrono::Utc;
use common::{CustomerId, ItemId, Money, OrderId, OrderStatus, ProductId};
use event_bus::{DomainEvent, EventDispatcher, EventDispatcherExt};

use crate::config::DomainConfig;

use super::{Item, Order, OrderError, OrderStore};

/// Service owning order creation, status changes, item changes and deletion.
///
/// Every mutating call follows the same sequence: load and validate, mutate
/// the in-memory order, persist, then publish. A failed write publishes
/// nothing; a failed publish is logged and the write stands.
pub struct OrderService<S: OrderStore, D: EventDispatcher> {
    store: S,
    dispatcher: D,
    config: DomainConfig,
}

impl<S: OrderStore, D: EventDispatcher> OrderService<S, D> {
    /// Creates a new order service with the default configuration.
    pub fn new(store: S, dispatcher: D) -> Self {
        Self::with_config(store, dispatcher, DomainConfig::default())
    }

    pub fn with_config(store: S, dispatcher: D, config: DomainConfig) -> Self {
        Self {
            store,
            dispatcher,
            config,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Creates an open, empty order for a customer.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(&self, customer_id: CustomerId) -> Result<OrderId, OrderError> {
        let order_id = OrderId::from_uuid(
            self.store
                .next_id()
                .await
                .map_err(OrderError::store("allocate order id"))?,
        );

        let order = Order::new(order_id, customer_id);
        self.store
            .store(&order)
            .await
            .map_err(OrderError::store("store order"))?;

        metrics::counter!("order_commands_total", "command" => "create_order").increment(1);
        tracing::info!(%order_id, "order created");
        self.dispatcher
            .publish(DomainEvent::order_created(order_id, customer_id))
            .await;

        Ok(order_id)
    }

    /// Changes the status of an order.
    ///
    /// Requesting the status the order already has succeeds without a write
    /// or an event.
    #[tracing::instrument(skip(self))]
    pub async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> Result<(), OrderError> {
        let mut order = self.load(order_id).await?;
        let previous = order.status();

        if !order.change_status(status, self.config.status_policy)? {
            tracing::debug!(%order_id, %status, "status unchanged");
            return Ok(());
        }

        self.save(&order, "update order status").await?;

        metrics::counter!("order_commands_total", "command" => "set_status").increment(1);
        tracing::info!(%order_id, from = %previous, to = %status, "order status changed");
        self.dispatcher
            .publish(DomainEvent::order_status_changed(order_id, status))
            .await;

        Ok(())
    }

    /// Adds an item to an open order and returns the new item's ID.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        price: Money,
    ) -> Result<ItemId, OrderError> {
        let mut order = self.load(order_id).await?;
        order.validate_new_item(price)?;

        let item_id = ItemId::from_uuid(
            self.store
                .next_id()
                .await
                .map_err(OrderError::store("allocate item id"))?,
        );
        order.add_item(Item::new(item_id, product_id, price))?;

        self.save(&order, "store order item").await?;

        metrics::counter!("order_commands_total", "command" => "add_item").increment(1);
        tracing::info!(%order_id, %item_id, %price, "item added");
        self.dispatcher
            .publish(DomainEvent::order_item_added(order_id, item_id))
            .await;

        Ok(item_id)
    }

    /// Removes an item from an open order.
    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, order_id: OrderId, item_id: ItemId) -> Result<(), OrderError> {
        let mut order = self.load(order_id).await?;
        order.remove_item(item_id)?;

        self.save(&order, "remove order item").await?;

        metrics::counter!("order_commands_total", "command" => "delete_item").increment(1);
        tracing::info!(%order_id, %item_id, "item removed");
        self.dispatcher
            .publish(DomainEvent::order_item_removed(order_id, item_id))
            .await;

        Ok(())
    }

    /// Soft-deletes an order. The record is kept with its deletion time set.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), OrderError> {
        self.load(order_id).await?;

        self.store
            .delete(order_id, Utc::now())
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    OrderError::OrderNotFound(order_id)
                } else {
                    OrderError::Store {
                        operation: "delete order",
                        source,
                    }
                }
            })?;

        metrics::counter!("order_commands_total", "command" => "delete_order").increment(1);
        tracing::info!(%order_id, "order deleted");
        self.dispatcher
            .publish(DomainEvent::order_removed(order_id))
            .await;

        Ok(())
    }

    /// Loads a live order.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.load(order_id).await
    }

    async fn load(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.store
            .find(order_id)
            .await
            .map_err(OrderError::store("load order"))?
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    async fn save(&self, order: &Order, operation: &'static str) -> Result<(), OrderError> {
        self.store
            .store(order)
            .await
            .map_err(|source| {
                // deleted between our read and this write
                if source.is_not_found() {
                    OrderError::OrderNotFound(order.id())
                } else {
                    OrderError::Store { operation, source }
                }
            })
    }
}
