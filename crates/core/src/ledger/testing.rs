//! Test doubles for the ledger store.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use coinkeeper_shared::types::{AccountId, UserId};

use super::service::LedgerService;
use super::store::{Collection, LedgerRecord, LedgerStore, MemoryLedgerStore, StoreError};
use super::types::{Account, Category, NewAccount, TransactionInput, TransactionType};

/// Memory store that can be told to fail writes or lose an account.
#[derive(Debug, Default)]
pub(crate) struct FaultyStore {
    inner: MemoryLedgerStore,
    failing: Mutex<HashSet<Collection>>,
    unreadable: Mutex<HashSet<Collection>>,
    vanishing_account: Mutex<Option<AccountId>>,
}

impl FaultyStore {
    /// Every later save of `collection` fails.
    pub(crate) fn fail_saves_of(&self, collection: Collection) {
        self.failing.lock().unwrap().insert(collection);
    }

    /// Every later load of `collection` fails.
    pub(crate) fn fail_loads_of(&self, collection: Collection) {
        self.unreadable.lock().unwrap().insert(collection);
    }

    pub(crate) fn heal(&self) {
        self.failing.lock().unwrap().clear();
        self.unreadable.lock().unwrap().clear();
    }

    /// The next transactions save also deletes `account_id` behind the
    /// service's back.
    pub(crate) fn drop_account_after_next_transaction_save(&self, account_id: AccountId) {
        *self.vanishing_account.lock().unwrap() = Some(account_id);
    }

    /// Raw write bypassing the service.
    pub(crate) async fn put<T: LedgerRecord>(&self, user_id: UserId, records: &[T]) {
        self.inner.save_all(user_id, records).await.unwrap();
    }
}

impl LedgerStore for FaultyStore {
    async fn load_all<T: LedgerRecord>(&self, user_id: UserId) -> Result<Vec<T>, StoreError> {
        let unreadable = self.unreadable.lock().unwrap().contains(&T::COLLECTION);
        if unreadable {
            return Err(StoreError::backend(T::COLLECTION.as_str(), "injected failure"));
        }
        self.inner.load_all(user_id).await
    }

    async fn save_all<T: LedgerRecord>(&self, user_id: UserId, records: &[T]) -> Result<(), StoreError> {
        let failing = self.failing.lock().unwrap().contains(&T::COLLECTION);
        if failing {
            return Err(StoreError::backend(T::COLLECTION.as_str(), "injected failure"));
        }
        self.inner.save_all(user_id, records).await?;

        if T::COLLECTION == Collection::Transactions {
            let vanishing = self.vanishing_account.lock().unwrap().take();
            if let Some(account_id) = vanishing {
                let mut accounts: Vec<Account> = self.inner.load_all(user_id).await?;
                accounts.retain(|a| a.id != account_id);
                self.inner.save_all(user_id, &accounts).await?;
            }
        }
        Ok(())
    }
}

/// A user with one account per entry and an income and expense category.
pub(crate) struct Ledger<S> {
    pub service: LedgerService<S>,
    pub store: Arc<S>,
    pub user: UserId,
    pub income: Category,
    pub expense: Category,
}

impl<S: LedgerStore> Ledger<S> {
    pub(crate) async fn new(store: S) -> Self {
        let store = Arc::new(store);
        let service = LedgerService::new(Arc::clone(&store));
        let user = UserId::new();
        let income = service
            .quick_create_category(user, TransactionType::Income, "Salary")
            .await
            .unwrap();
        let expense = service
            .quick_create_category(user, TransactionType::Expense, "Groceries")
            .await
            .unwrap();
        Self {
            service,
            store,
            user,
            income,
            expense,
        }
    }

    pub(crate) async fn open(&self, name: &str, initial_balance: Decimal) -> Account {
        self.service
            .create_account(
                self.user,
                NewAccount {
                    name: name.to_string(),
                    initial_balance,
                },
            )
            .await
            .unwrap()
    }

    pub(crate) async fn balance(&self, account_id: AccountId) -> Decimal {
        self.service
            .get_account(self.user, account_id)
            .await
            .unwrap()
            .balance
    }

    pub(crate) fn input(&self, kind: TransactionType, amount: Decimal, account_id: AccountId) -> TransactionInput {
        let category = match kind {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        };
        TransactionInput {
            kind: kind.as_str().to_string(),
            amount,
            category_id: category.id,
            account_id,
            date: "2025-03-10T09:00:00Z".to_string(),
            comment: None,
        }
    }
}
