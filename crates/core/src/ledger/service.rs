//! Ledger service: the only entry point that mutates a user's ledger.
//!
//! Transactions and account balances live in separate collections and the
//! store cannot write both atomically. Each mutation therefore runs under the
//! user's lock and follows a fixed ordering with compensating writes, so a
//! caller observes either the complete change or none of it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use coinkeeper_shared::types::{TransactionId, UserId};

use super::balance::{BalanceEngine, ReconcileError};
use super::error::LedgerError;
use super::locks::UserLocks;
use super::store::{LedgerRecord, LedgerStore};
use super::types::{Account, Category, Transaction, TransactionInput};
use super::validation::validate_transaction;
use crate::category::CategoryDirectory;

/// Ledger operations for all users, backed by a [`LedgerStore`].
#[derive(Debug)]
pub struct LedgerService<S> {
    store: Arc<S>,
    locks: UserLocks,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a new ledger service.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) fn locks(&self) -> &UserLocks {
        &self.locks
    }

    pub(crate) async fn load<T: LedgerRecord>(&self, user_id: UserId) -> Result<Vec<T>, LedgerError> {
        Ok(self.store.load_all(user_id).await?)
    }

    pub(crate) async fn save<T: LedgerRecord>(
        &self,
        user_id: UserId,
        records: &[T],
    ) -> Result<(), LedgerError> {
        Ok(self.store.save_all(user_id, records).await?)
    }

    /// Writes `snapshot` back after a later step failed.
    async fn compensate<T: LedgerRecord>(&self, user_id: UserId, snapshot: &[T], cause: &LedgerError) {
        let collection = T::COLLECTION;
        warn!(%user_id, %collection, error = %cause, "rolling back partial ledger change");

        if let Err(rollback) = self.store.save_all(user_id, snapshot).await {
            error!(
                %user_id,
                %collection,
                error = %cause,
                rollback_error = %rollback,
                "rollback failed; run account recompute to repair balances"
            );
        }
    }

    /// Records a new transaction and adds its effect to the account balance.
    ///
    /// The transaction is persisted first. If the balance cannot be updated
    /// afterwards, the transaction is removed again and the error returned.
    pub async fn create_transaction(
        &self,
        user_id: UserId,
        input: TransactionInput,
    ) -> Result<Transaction, LedgerError> {
        let _guard = self.locks.acquire(user_id).await;

        let categories: Vec<Category> = self.load(user_id).await?;
        let accounts: Vec<Account> = self.load(user_id).await?;
        let fields = validate_transaction(&input, CategoryDirectory::new(&categories), &accounts)?;
        let transaction = Transaction::record(fields, Utc::now());

        let mut transactions: Vec<Transaction> = self.load(user_id).await?;
        let snapshot = transactions.clone();
        transactions.push(transaction.clone());
        self.save(user_id, &transactions).await?;
        debug!(%user_id, transaction_id = %transaction.id, "transaction persisted");

        if let Err(err) = self.reconcile_created(user_id, &transaction).await {
            self.compensate(user_id, &snapshot, &err).await;
            return Err(err);
        }

        info!(
            %user_id,
            transaction_id = %transaction.id,
            account_id = %transaction.account_id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "transaction created"
        );
        Ok(transaction)
    }

    async fn reconcile_created(&self, user_id: UserId, transaction: &Transaction) -> Result<(), LedgerError> {
        // Accounts are re-read once the transaction is durable.
        let mut accounts: Vec<Account> = self.load(user_id).await?;
        BalanceEngine::apply_create(&mut accounts, transaction)?;
        self.save(user_id, &accounts).await
    }

    /// Replaces a transaction's fields and moves balances accordingly.
    ///
    /// Balances are computed on a copy first; nothing is written unless the
    /// whole reconciliation succeeds. If storing the transaction fails after
    /// the balances were saved, the balances are restored.
    pub async fn update_transaction(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
        input: TransactionInput,
    ) -> Result<Transaction, LedgerError> {
        let _guard = self.locks.acquire(user_id).await;

        let categories: Vec<Category> = self.load(user_id).await?;
        let accounts: Vec<Account> = self.load(user_id).await?;
        let fields = validate_transaction(&input, CategoryDirectory::new(&categories), &accounts)?;

        let mut transactions: Vec<Transaction> = self.load(user_id).await?;
        let index = transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| LedgerError::not_found("Transaction", transaction_id))?;
        let old = transactions[index].clone();
        let updated = old.revise(fields, Utc::now());

        let mut next_accounts = accounts.clone();
        let delta = BalanceEngine::apply_update(&mut next_accounts, &old, &updated)?;

        let balances_moved = !delta.is_noop();
        if balances_moved {
            self.save(user_id, &next_accounts).await?;
        }

        transactions[index] = updated.clone();
        if let Err(err) = self.save(user_id, &transactions).await {
            if balances_moved {
                self.compensate(user_id, &accounts, &err).await;
            }
            return Err(err);
        }

        info!(
            %user_id,
            transaction_id = %updated.id,
            from_account = %old.account_id,
            to_account = %updated.account_id,
            balances_moved,
            "transaction updated"
        );
        Ok(updated)
    }

    /// Deletes a transaction and reverses its balance effect.
    ///
    /// A missing account never blocks the deletion; the reversal is skipped.
    pub async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<(), LedgerError> {
        let _guard = self.locks.acquire(user_id).await;

        let mut transactions: Vec<Transaction> = self.load(user_id).await?;
        let index = transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| LedgerError::not_found("Transaction", transaction_id))?;
        let removed = transactions.remove(index);

        let accounts: Vec<Account> = self.load(user_id).await?;
        let mut next_accounts = accounts.clone();
        let balances_moved = match BalanceEngine::apply_delete(&mut next_accounts, &removed) {
            Ok(delta) => !delta.is_noop(),
            Err(ReconcileError::AccountNotFound(account_id)) => {
                warn!(
                    %user_id,
                    transaction_id = %removed.id,
                    %account_id,
                    "account missing; deleting transaction without balance reversal"
                );
                false
            }
            Err(err @ ReconcileError::Overflow(_)) => return Err(err.into()),
        };
        if balances_moved {
            self.save(user_id, &next_accounts).await?;
        }

        if let Err(err) = self.save(user_id, &transactions).await {
            if balances_moved {
                self.compensate(user_id, &accounts, &err).await;
            }
            return Err(err);
        }

        info!(%user_id, transaction_id = %removed.id, "transaction deleted");
        Ok(())
    }
}
