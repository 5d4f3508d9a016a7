//! Transactional core of the order and payment services.
//!
//! This crate provides:
//! - [`OrderService`]: order creation, status transitions, item changes and soft deletion
//! - [`PaymentProcessor`]: ledger accounts and idempotent, per-order payment settlement
//! - Store traits per aggregate ([`OrderStore`], [`LedgerStore`]) with in-memory implementations
//!
//! Every mutating operation validates, mutates, persists and only then publishes
//! its event. Publishing is best effort and never undoes a committed write.

pub mod config;
pub mod error;
pub mod order;
pub mod payment;

pub use common::{
    AccountId, CustomerId, ItemId, Money, OrderId, OrderStatus, ProductId, TransactionId, UserId,
};
pub use config::{DomainConfig, StatusPolicy};
pub use error::{DomainError, StoreError, StoreResult};
pub use order::{InMemoryOrderStore, Item, Order, OrderError, OrderService, OrderStore};
pub use payment::{
    Account, InMemoryLedgerStore, LedgerStore, PaymentError, PaymentProcessor, Transaction,
};
