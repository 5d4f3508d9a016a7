use async_trait::async_trait;
use common::{OrderId, UserId};
use uuid::Uuid;

use crate::error::StoreResult;

use super::{Account, Transaction};

/// Persistence boundary for accounts and transactions.
///
/// The order ID is a unique key on transactions; that constraint is what
/// makes repeated payment requests safe.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Allocates a fresh identity for an account or a transaction.
    async fn next_id(&self) -> StoreResult<Uuid>;

    /// Inserts a new account or replaces an existing one by ID.
    ///
    /// Fails with `DuplicateKey` if a different account already belongs to
    /// the same user.
    async fn store_account(&self, account: &Account) -> StoreResult<()>;

    async fn find_account_by_user(&self, user_id: UserId) -> StoreResult<Option<Account>>;

    async fn find_transaction_by_order(&self, order_id: OrderId)
    -> StoreResult<Option<Transaction>>;

    /// Atomically writes a debited account together with its transaction.
    ///
    /// Nothing is written if:
    /// - a transaction already exists for `transaction.order_id` (`DuplicateKey`)
    /// - the stored account version differs from `account.version` (`Conflict`)
    /// - the account does not exist (`NotFound`)
    ///
    /// On success the stored account version is bumped.
    async fn commit_payment(&self, account: &Account, transaction: &Transaction)
    -> StoreResult<()>;
}
