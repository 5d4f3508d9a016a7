use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::{OrderId, UserId};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

use super::{Account, LedgerStore, Transaction};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<UserId, Account>,
    transactions: HashMap<OrderId, Transaction>,
}

/// In-memory ledger store for tests and single-process use.
///
/// A single lock guards accounts and transactions, so `commit_payment` is
/// atomic with respect to every other call.
#[derive(Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryLedgerStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a backend error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored transactions.
    pub async fn transaction_count(&self) -> usize {
        self.state.read().await.transactions.len()
    }

    /// Returns the number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("ledger store unavailable".to_string()));
        }
        Ok(())
    }
}

fn version_conflict(account: &Account, actual: u64) -> StoreError {
    StoreError::Conflict {
        entity: "Account",
        id: account.id.to_string(),
        expected: account.version,
        actual,
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn next_id(&self) -> StoreResult<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn store_account(&self, account: &Account) -> StoreResult<()> {
        self.check_writable()?;

        let mut state = self.state.write().await;
        let existing = state
            .accounts
            .get(&account.user_id)
            .map(|stored| (stored.id, stored.version));

        match existing {
            None => {
                state.accounts.insert(account.user_id, account.clone());
            }
            Some((id, _)) if id != account.id => {
                return Err(StoreError::duplicate_key("Account", account.user_id));
            }
            Some((_, version)) if version != account.version => {
                return Err(version_conflict(account, version));
            }
            Some((_, version)) => {
                let mut updated = account.clone();
                updated.version = version + 1;
                state.accounts.insert(account.user_id, updated);
            }
        }

        Ok(())
    }

    async fn find_account_by_user(&self, user_id: UserId) -> StoreResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&user_id).cloned())
    }

    async fn find_transaction_by_order(
        &self,
        order_id: OrderId,
    ) -> StoreResult<Option<Transaction>> {
        Ok(self.state.read().await.transactions.get(&order_id).cloned())
    }

    async fn commit_payment(
        &self,
        account: &Account,
        transaction: &Transaction,
    ) -> StoreResult<()> {
        self.check_writable()?;

        let mut state = self.state.write().await;

        if state.transactions.contains_key(&transaction.order_id) {
            return Err(StoreError::duplicate_key(
                "Transaction",
                transaction.order_id,
            ));
        }

        let stored_version = match state.accounts.get(&account.user_id) {
            Some(stored) if stored.id == account.id => stored.version,
            _ => return Err(StoreError::not_found("Account", account.id)),
        };
        if stored_version != account.version {
            return Err(version_conflict(account, stored_version));
        }

        let mut updated = account.clone();
        updated.version = stored_version + 1;
        state.accounts.insert(account.user_id, updated);
        state
            .transactions
            .insert(transaction.order_id, transaction.clone());

        Ok(())
    }
}
