//! Payment processor.

use chrono::Utc;
use common::{AccountId, Money, OrderId, TransactionId, UserId};
use event_bus::{DomainEvent, EventDispatcher, EventDispatcherExt, REASON_INSUFFICIENT_FUNDS};

use crate::error::StoreError;

use super::{Account, LedgerStore, PaymentError, Transaction};

/// Owns account balances and settles payments at most once per order.
///
/// `process_payment` is safe to call repeatedly for the same order: the
/// first successful call settles it and every later call (including a
/// concurrent one that loses the write) returns the settled transaction.
pub struct PaymentProcessor<S: LedgerStore, D: EventDispatcher> {
    store: S,
    dispatcher: D,
}

impl<S: LedgerStore, D: EventDispatcher> PaymentProcessor<S, D> {
    pub fn new(store: S, dispatcher: D) -> Self {
        Self { store, dispatcher }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Opens an account for a user. No event is published.
    #[tracing::instrument(skip(self))]
    pub async fn create_account(
        &self,
        user_id: UserId,
        initial_balance: Money,
    ) -> Result<Account, PaymentError> {
        if initial_balance.is_negative() {
            return Err(PaymentError::InvalidAmount {
                amount: initial_balance,
            });
        }

        if self
            .store
            .find_account_by_user(user_id)
            .await
            .map_err(PaymentError::store("look up account"))?
            .is_some()
        {
            return Err(PaymentError::AccountAlreadyExists(user_id));
        }

        let account_id = AccountId::from_uuid(
            self.store
                .next_id()
                .await
                .map_err(PaymentError::store("allocate account id"))?,
        );
        let account = Account::new(account_id, user_id, initial_balance);

        self.store
            .store_account(&account)
            .await
            .map_err(|source| {
                if source.is_duplicate_key() {
                    PaymentError::AccountAlreadyExists(user_id)
                } else {
                    PaymentError::Store {
                        operation: "store account",
                        source,
                    }
                }
            })?;

        tracing::info!(%account_id, %initial_balance, "account created");
        Ok(account)
    }

    /// Debits `amount` from the user's account and records it against `order_id`.
    ///
    /// If the order is already settled the existing transaction is returned
    /// and nothing is debited or published. An uncovered amount publishes
    /// `PaymentFailed` and leaves the balance untouched.
    #[tracing::instrument(skip(self))]
    pub async fn process_payment(
        &self,
        user_id: UserId,
        order_id: OrderId,
        amount: Money,
    ) -> Result<Transaction, PaymentError> {
        if !amount.is_positive() {
            return Err(PaymentError::InvalidAmount { amount });
        }

        if let Some(settled) = self
            .store
            .find_transaction_by_order(order_id)
            .await
            .map_err(PaymentError::store("check for existing transaction"))?
        {
            return Ok(self.replay(settled, amount));
        }

        let mut account = self
            .store
            .find_account_by_user(user_id)
            .await
            .map_err(PaymentError::store("look up account"))?
            .ok_or(PaymentError::AccountNotFound(user_id))?;

        if !account.can_cover(amount) {
            metrics::counter!("payments_failed_total").increment(1);
            tracing::warn!(%order_id, balance = %account.balance, %amount, "insufficient funds");
            self.dispatcher
                .publish(DomainEvent::payment_failed(
                    order_id,
                    user_id,
                    REASON_INSUFFICIENT_FUNDS,
                ))
                .await;
            return Err(PaymentError::InsufficientFunds {
                balance: account.balance,
                requested: amount,
            });
        }

        let transaction_id = TransactionId::from_uuid(
            self.store
                .next_id()
                .await
                .map_err(PaymentError::store("allocate transaction id"))?,
        );

        let now = Utc::now();
        account.balance -= amount;
        account.updated_at = now;
        let transaction = Transaction {
            id: transaction_id,
            account_id: account.id,
            order_id,
            amount,
            timestamp: now,
        };

        if let Err(source) = self.store.commit_payment(&account, &transaction).await {
            if source.is_duplicate_key() {
                // lost the race to a concurrent request for the same order
                return self.recover_settled(order_id, amount, source).await;
            }
            return Err(PaymentError::Store {
                operation: "commit payment",
                source,
            });
        }

        metrics::counter!("payments_succeeded_total").increment(1);
        tracing::info!(%order_id, %transaction_id, %amount, balance = %account.balance, "payment settled");
        self.dispatcher
            .publish(DomainEvent::payment_succeeded(
                transaction_id,
                order_id,
                user_id,
                amount,
            ))
            .await;

        Ok(transaction)
    }

    /// Returns the user's account.
    #[tracing::instrument(skip(self))]
    pub async fn get_account_by_user_id(&self, user_id: UserId) -> Result<Account, PaymentError> {
        self.store
            .find_account_by_user(user_id)
            .await
            .map_err(PaymentError::store("look up account"))?
            .ok_or(PaymentError::AccountNotFound(user_id))
    }

    async fn recover_settled(
        &self,
        order_id: OrderId,
        amount: Money,
        duplicate: StoreError,
    ) -> Result<Transaction, PaymentError> {
        match self.store.find_transaction_by_order(order_id).await {
            Ok(Some(settled)) => Ok(self.replay(settled, amount)),
            Ok(None) => Err(PaymentError::Store {
                operation: "recover settled transaction",
                source: duplicate,
            }),
            Err(source) => Err(PaymentError::Store {
                operation: "recover settled transaction",
                source,
            }),
        }
    }

    fn replay(&self, settled: Transaction, requested: Money) -> Transaction {
        metrics::counter!("payments_replayed_total").increment(1);
        if settled.amount != requested {
            tracing::warn!(
                order_id = %settled.order_id,
                settled = %settled.amount,
                %requested,
                "replayed payment amount differs from settled transaction"
            );
        } else {
            tracing::debug!(order_id = %settled.order_id, transaction_id = %settled.id, "payment already settled");
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::InMemoryLedgerStore;
    use event_bus::InMemoryEventDispatcher;

    fn create_processor() -> (
        PaymentProcessor<InMemoryLedgerStore, InMemoryEventDispatcher>,
        InMemoryEventDispatcher,
    ) {
        let dispatcher = InMemoryEventDispatcher::new();
        let processor = PaymentProcessor::new(InMemoryLedgerStore::new(), dispatcher.clone());
        (processor, dispatcher)
    }

    #[tokio::test]
    async fn test_create_account() {
        let (processor, dispatcher) = create_processor();
        let user_id = UserId::new();

        let account = processor
            .create_account(user_id, Money::from_units(100))
            .await
            .unwrap();

        assert_eq!(account.user_id, user_id);
        assert_eq!(account.balance, Money::from_units(100));
        assert_eq!(
            processor.get_account_by_user_id(user_id).await.unwrap(),
            account
        );
        assert_eq!(dispatcher.event_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_account_zero_balance() {
        let (processor, _) = create_processor();
        let account = processor
            .create_account(UserId::new(), Money::zero())
            .await
            .unwrap();
        assert!(account.balance.is_zero());
    }

    #[tokio::test]
    async fn test_create_account_negative_balance() {
        let (processor, _) = create_processor();
        let result = processor
            .create_account(UserId::new(), Money::from_cents(-1))
            .await;
        assert!(matches!(result, Err(PaymentError::InvalidAmount { .. })));
        assert_eq!(processor.store().account_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_account_twice() {
        let (processor, _) = create_processor();
        let user_id = UserId::new();
        processor
            .create_account(user_id, Money::from_units(10))
            .await
            .unwrap();

        let result = processor.create_account(user_id, Money::from_units(20)).await;

        assert!(matches!(result, Err(PaymentError::AccountAlreadyExists(id)) if id == user_id));
        let account = processor.get_account_by_user_id(user_id).await.unwrap();
        assert_eq!(account.balance, Money::from_units(10));
    }

    #[tokio::test]
    async fn test_process_payment() {
        let (processor, dispatcher) = create_processor();
        let user_id = UserId::new();
        processor
            .create_account(user_id, Money::from_units(100))
            .await
            .unwrap();
        let order_id = OrderId::new();

        let tx = processor
            .process_payment(user_id, order_id, Money::from_units(75))
            .await
            .unwrap();

        assert_eq!(tx.order_id, order_id);
        assert_eq!(tx.amount, Money::from_units(75));
        let account = processor.get_account_by_user_id(user_id).await.unwrap();
        assert_eq!(account.balance, Money::from_units(25));
        assert_eq!(tx.account_id, account.id);
        assert_eq!(
            dispatcher.events().await,
            vec![DomainEvent::payment_succeeded(
                tx.id,
                order_id,
                user_id,
                Money::from_units(75)
            )]
        );
    }

    #[tokio::test]
    async fn test_non_positive_amount() {
        let (processor, dispatcher) = create_processor();
        let user_id = UserId::new();
        processor
            .create_account(user_id, Money::from_units(100))
            .await
            .unwrap();

        for amount in [Money::zero(), Money::from_cents(-500)] {
            let result = processor
                .process_payment(user_id, OrderId::new(), amount)
                .await;
            assert!(matches!(result, Err(PaymentError::InvalidAmount { .. })));
        }
        assert_eq!(dispatcher.event_count().await, 0);
    }

    #[tokio::test]
    async fn test_exact_balance_is_covered() {
        let (processor, _) = create_processor();
        let user_id = UserId::new();
        processor
            .create_account(user_id, Money::from_units(40))
            .await
            .unwrap();

        processor
            .process_payment(user_id, OrderId::new(), Money::from_units(40))
            .await
            .unwrap();

        let account = processor.get_account_by_user_id(user_id).await.unwrap();
        assert!(account.balance.is_zero());
    }

    #[tokio::test]
    async fn test_account_not_found() {
        let (processor, dispatcher) = create_processor();
        let user_id = UserId::new();

        let result = processor
            .process_payment(user_id, OrderId::new(), Money::from_units(50))
            .await;

        assert!(matches!(result, Err(PaymentError::AccountNotFound(id)) if id == user_id));
        assert!(matches!(
            processor.get_account_by_user_id(user_id).await,
            Err(PaymentError::AccountNotFound(_))
        ));
        assert_eq!(dispatcher.event_count().await, 0);
    }
}
