//! Ledger accounts, transactions and the payment processor.

mod account;
mod memory;
mod processor;
mod store;

pub use account::{Account, Transaction};
pub use memory::InMemoryLedgerStore;
pub use processor::PaymentProcessor;
pub use store::LedgerStore;

use common::{Money, UserId};
use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The amount is not valid for this operation.
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Money },

    /// The user has no account.
    #[error("Account not found for user {0}")]
    AccountNotFound(UserId),

    /// The user already has an account.
    #[error("Account already exists for user {0}")]
    AccountAlreadyExists(UserId),

    /// The balance cannot cover the payment.
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Money, requested: Money },

    /// The ledger store failed.
    #[error("Failed to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl PaymentError {
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| PaymentError::Store { operation, source }
    }
}
