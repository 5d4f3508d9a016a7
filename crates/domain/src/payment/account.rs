use chrono::{DateTime, Utc};
use common::{AccountId, Money, OrderId, TransactionId, UserId};
use serde::{Deserialize, Serialize};

/// A user's ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,

    /// Current balance; never negative after a committed payment.
    pub balance: Money,

    /// Store version for optimistic concurrency; 0 until first update.
    #[serde(default)]
    pub version: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: AccountId, user_id: UserId, balance: Money) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            balance,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the balance covers `amount`.
    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}

/// Immutable record of a settled payment. At most one exists per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,

    /// The idempotency key.
    pub order_id: OrderId,

    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}
