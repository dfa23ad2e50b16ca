//! Balance reconciliation engine.
//!
//! Keeps every account's stored balance equal to its initial balance plus the
//! signed sum of its transactions (income `+amount`, expense `-amount`).
//!
//! Lifecycle events are applied incrementally: each event is turned into a
//! [`BalanceDelta`] and the delta is applied in one step. Every affected
//! account is resolved before any balance moves, so a failed apply leaves the
//! slice untouched. [`BalanceEngine::recompute`] rebuilds a balance from full
//! history and is only used for repair.

use rust_decimal::Decimal;
use thiserror::Error;
use coinkeeper_shared::types::AccountId;

use super::types::{Account, BalanceDrift, Transaction};

/// Reconciliation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A transaction points at an account that does not exist.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// The resulting balance would not fit a `Decimal`.
    #[error("balance of account {0} is out of range")]
    Overflow(AccountId),
}

/// Net balance movement per account produced by one lifecycle event.
///
/// Holds at most two entries: the old and the new account of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceDelta {
    entries: Vec<(AccountId, Decimal)>,
}

impl BalanceDelta {
    fn add(&mut self, account_id: AccountId, amount: Decimal) {
        let merged = self
            .entries
            .iter_mut()
            .find(|(id, _)| *id == account_id)
            .and_then(|(_, total)| total.checked_add(amount).map(|sum| *total = sum));
        // Entries that cannot be merged stay separate and fail in `apply`.
        if merged.is_none() {
            self.entries.push((account_id, amount));
        }
    }

    /// Effect of a new transaction.
    #[must_use]
    pub fn for_create(transaction: &Transaction) -> Self {
        let mut delta = Self::default();
        delta.add(transaction.account_id, transaction.signed_amount());
        delta
    }

    /// Undo `old`, then apply `new`, merged per account.
    ///
    /// Same account and type nets to the amount difference; a type flip on
    /// the same account nets to both signed amounts; a move touches two
    /// accounts.
    #[must_use]
    pub fn for_update(old: &Transaction, new: &Transaction) -> Self {
        let mut delta = Self::default();
        delta.add(old.account_id, -old.signed_amount());
        delta.add(new.account_id, new.signed_amount());
        delta
    }

    /// Reversal of an existing transaction.
    #[must_use]
    pub fn for_delete(transaction: &Transaction) -> Self {
        let mut delta = Self::default();
        delta.add(transaction.account_id, -transaction.signed_amount());
        delta
    }

    /// Change for one account; zero if untouched.
    #[must_use]
    pub fn change_for(&self, account_id: AccountId) -> Decimal {
        self.entries
            .iter()
            .filter(|(id, _)| *id == account_id)
            .fold(Decimal::ZERO, |total, (_, amount)| total.saturating_add(*amount))
    }

    /// Accounts this delta refers to, including zero entries.
    pub fn accounts(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// True when no balance would move.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.entries.iter().all(|(_, amount)| amount.is_zero())
    }
}

/// Stateless reconciliation operations.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Applies `delta` to `accounts` atomically.
    ///
    /// Every referenced account must exist, even for zero entries, and every
    /// new balance must be representable. On error no balance has changed.
    pub fn apply(accounts: &mut [Account], delta: &BalanceDelta) -> Result<(), ReconcileError> {
        let mut next: Vec<(usize, Decimal)> = Vec::with_capacity(delta.entries.len());
        for (account_id, amount) in &delta.entries {
            let index = accounts
                .iter()
                .position(|account| account.id == *account_id)
                .ok_or(ReconcileError::AccountNotFound(*account_id))?;
            let current = next
                .iter()
                .find(|(i, _)| *i == index)
                .map_or(accounts[index].balance, |(_, balance)| *balance);
            let balance = current
                .checked_add(*amount)
                .ok_or(ReconcileError::Overflow(*account_id))?;
            match next.iter_mut().find(|(i, _)| *i == index) {
                Some((_, pending)) => *pending = balance,
                None => next.push((index, balance)),
            }
        }

        for (index, balance) in next {
            accounts[index].balance = balance;
        }
        Ok(())
    }

    /// Adds a new transaction's effect to its account.
    pub fn apply_create(
        accounts: &mut [Account],
        transaction: &Transaction,
    ) -> Result<BalanceDelta, ReconcileError> {
        let delta = BalanceDelta::for_create(transaction);
        Self::apply(accounts, &delta)?;
        Ok(delta)
    }

    /// Replaces `old`'s effect with `new`'s effect.
    ///
    /// Both the old and the new account must exist; otherwise nothing changes.
    pub fn apply_update(
        accounts: &mut [Account],
        old: &Transaction,
        new: &Transaction,
    ) -> Result<BalanceDelta, ReconcileError> {
        let delta = BalanceDelta::for_update(old, new);
        Self::apply(accounts, &delta)?;
        Ok(delta)
    }

    /// Removes a transaction's effect from its account.
    pub fn apply_delete(
        accounts: &mut [Account],
        transaction: &Transaction,
    ) -> Result<BalanceDelta, ReconcileError> {
        let delta = BalanceDelta::for_delete(transaction);
        Self::apply(accounts, &delta)?;
        Ok(delta)
    }

    /// Balance of `account_id` rebuilt from scratch.
    ///
    /// Transactions for other accounts are ignored, so the full history can
    /// be passed in. The result does not depend on iteration order.
    pub fn recompute<'a>(
        account_id: AccountId,
        initial_balance: Decimal,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<Decimal, ReconcileError> {
        transactions
            .into_iter()
            .filter(|transaction| transaction.account_id == account_id)
            .try_fold(initial_balance, |balance, transaction| {
                balance
                    .checked_add(transaction.signed_amount())
                    .ok_or(ReconcileError::Overflow(account_id))
            })
    }

    /// Compares stored balances with recomputed ones.
    pub fn audit(
        accounts: &[Account],
        transactions: &[Transaction],
    ) -> Result<Vec<BalanceDrift>, ReconcileError> {
        accounts
            .iter()
            .map(|account| -> Result<BalanceDrift, ReconcileError> {
                let expected = Self::recompute(account.id, account.initial_balance, transactions)?;
                let drift = account
                    .balance
                    .checked_sub(expected)
                    .ok_or(ReconcileError::Overflow(account.id))?;
                Ok(BalanceDrift {
                    account_id: account.id,
                    stored: account.balance,
                    expected,
                    drift,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{TransactionFields, TransactionType};
    use chrono::{Duration, Utc};
    use coinkeeper_shared::types::CategoryId;
    use rust_decimal_macros::dec;

    fn account(name: &str, initial: Decimal) -> Account {
        Account::open(name.to_string(), initial)
    }

    fn txn(account: &Account, kind: TransactionType, amount: Decimal) -> Transaction {
        Transaction::record(
            TransactionFields {
                kind,
                amount,
                category_id: CategoryId::new(),
                account_id: account.id,
                date: Utc::now(),
                comment: String::new(),
            },
            Utc::now(),
        )
    }

    fn edited(
        original: &Transaction,
        account_id: AccountId,
        kind: TransactionType,
        amount: Decimal,
    ) -> Transaction {
        let mut next = original.clone();
        next.account_id = account_id;
        next.kind = kind;
        next.amount = amount;
        next
    }

    #[test]
    fn test_create_expense_subtracts() {
        let mut accounts = vec![account("Cash", dec!(1000))];
        let expense = txn(&accounts[0], TransactionType::Expense, dec!(200));

        BalanceEngine::apply_create(&mut accounts, &expense).unwrap();
        assert_eq!(accounts[0].balance, dec!(800));
    }

    #[test]
    fn test_create_income_adds() {
        let mut accounts = vec![account("Cash", dec!(0))];
        let income = txn(&accounts[0], TransactionType::Income, dec!(0.10));

        BalanceEngine::apply_create(&mut accounts, &income).unwrap();
        BalanceEngine::apply_create(&mut accounts, &income).unwrap();
        BalanceEngine::apply_create(&mut accounts, &income).unwrap();
        assert_eq!(accounts[0].balance, dec!(0.30));
    }

    #[test]
    fn test_create_with_unknown_account_fails() {
        let mut accounts = vec![account("Cash", dec!(50))];
        let ghost = account("Ghost", dec!(0));
        let expense = txn(&ghost, TransactionType::Expense, dec!(10));

        let err = BalanceEngine::apply_create(&mut accounts, &expense).unwrap_err();
        assert_eq!(err, ReconcileError::AccountNotFound(ghost.id));
        assert_eq!(accounts[0].balance, dec!(50));
    }

    #[test]
    fn test_update_same_account_same_type_applies_difference() {
        let mut accounts = vec![account("Cash", dec!(1000))];
        let old = txn(&accounts[0], TransactionType::Expense, dec!(200));
        BalanceEngine::apply_create(&mut accounts, &old).unwrap();

        let new = edited(&old, old.account_id, TransactionType::Expense, dec!(150));
        let delta = BalanceEngine::apply_update(&mut accounts, &old, &new).unwrap();

        assert_eq!(delta.change_for(old.account_id), dec!(50));
        assert_eq!(accounts[0].balance, dec!(850));
    }

    #[test]
    fn test_update_type_flip_reverses_and_reapplies() {
        let mut accounts = vec![account("Cash", dec!(850))];
        let old = txn(&accounts[0], TransactionType::Expense, dec!(150));

        let new = edited(&old, old.account_id, TransactionType::Income, dec!(150));
        BalanceEngine::apply_update(&mut accounts, &old, &new).unwrap();

        assert_eq!(accounts[0].balance, dec!(1150));
    }

    #[test]
    fn test_update_moves_effect_between_accounts() {
        let mut accounts = vec![
            account("A", dec!(0)),
            account("B", dec!(0)),
            account("C", dec!(0)),
        ];
        let old = txn(&accounts[0], TransactionType::Expense, dec!(100));
        BalanceEngine::apply_create(&mut accounts, &old).unwrap();

        let new = edited(&old, accounts[1].id, TransactionType::Expense, dec!(100));
        BalanceEngine::apply_update(&mut accounts, &old, &new).unwrap();

        assert_eq!(accounts[0].balance, dec!(0));
        assert_eq!(accounts[1].balance, dec!(-100));
        assert_eq!(accounts[2].balance, dec!(0));
    }

    #[test]
    fn test_update_to_missing_account_changes_nothing() {
        let mut accounts = vec![account("A", dec!(500))];
        let old = txn(&accounts[0], TransactionType::Income, dec!(100));
        BalanceEngine::apply_create(&mut accounts, &old).unwrap();

        let missing = AccountId::new();
        let new = edited(&old, missing, TransactionType::Income, dec!(100));
        let err = BalanceEngine::apply_update(&mut accounts, &old, &new).unwrap_err();

        assert_eq!(err, ReconcileError::AccountNotFound(missing));
        assert_eq!(accounts[0].balance, dec!(600));
    }

    #[test]
    fn test_update_comment_and_date_is_noop() {
        let mut accounts = vec![account("A", dec!(42))];
        let old = txn(&accounts[0], TransactionType::Expense, dec!(7.25));
        BalanceEngine::apply_create(&mut accounts, &old).unwrap();
        let before = accounts.clone();

        let mut new = old.clone();
        new.comment = "coffee".into();
        new.date = old.date - Duration::days(3);
        let delta = BalanceEngine::apply_update(&mut accounts, &old, &new).unwrap();

        assert!(delta.is_noop());
        assert_eq!(accounts, before);
    }

    #[test]
    fn test_delete_reverses_create() {
        let mut accounts = vec![account("Bank", dec!(0))];
        let income = txn(&accounts[0], TransactionType::Income, dec!(150));
        BalanceEngine::apply_create(&mut accounts, &income).unwrap();

        BalanceEngine::apply_delete(&mut accounts, &income).unwrap();
        assert_eq!(accounts[0].balance, dec!(0));
    }

    #[test]
    fn test_recompute_ignores_other_accounts() {
        let cash = account("Cash", dec!(100));
        let bank = account("Bank", dec!(0));
        let history = vec![
            txn(&cash, TransactionType::Income, dec!(50)),
            txn(&bank, TransactionType::Income, dec!(999)),
            txn(&cash, TransactionType::Expense, dec!(20)),
        ];

        assert_eq!(
            BalanceEngine::recompute(cash.id, cash.initial_balance, &history).unwrap(),
            dec!(130)
        );
    }

    #[test]
    fn test_create_past_decimal_range_changes_nothing() {
        let mut accounts = vec![account("Cash", dec!(1))];
        let income = txn(&accounts[0], TransactionType::Income, Decimal::MAX);

        let err = BalanceEngine::apply_create(&mut accounts, &income).unwrap_err();
        assert_eq!(err, ReconcileError::Overflow(accounts[0].id));
        assert_eq!(accounts[0].balance, dec!(1));
    }

    #[test]
    fn test_update_overflow_on_second_account_changes_neither() {
        let mut accounts = vec![account("A", dec!(0)), account("B", Decimal::MAX)];
        let old = txn(&accounts[0], TransactionType::Expense, dec!(5));
        BalanceEngine::apply_create(&mut accounts, &old).unwrap();
        let before = accounts.clone();

        let new = edited(&old, accounts[1].id, TransactionType::Income, dec!(5));
        let err = BalanceEngine::apply_update(&mut accounts, &old, &new).unwrap_err();

        assert_eq!(err, ReconcileError::Overflow(accounts[1].id));
        assert_eq!(accounts, before);
    }

    #[test]
    fn test_recompute_and_audit_report_overflow() {
        let cash = account("Cash", Decimal::MAX);
        let history = vec![txn(&cash, TransactionType::Income, dec!(1))];

        assert_eq!(
            BalanceEngine::recompute(cash.id, cash.initial_balance, &history),
            Err(ReconcileError::Overflow(cash.id))
        );
        assert!(BalanceEngine::audit(&[cash], &history).is_err());
    }

    #[test]
    fn test_audit_reports_drift() {
        let mut cash = account("Cash", dec!(100));
        let history = vec![txn(&cash, TransactionType::Expense, dec!(30))];
        cash.balance = dec!(75);

        let report = BalanceEngine::audit(&[cash.clone()], &history).unwrap();
        assert_eq!(
            report,
            vec![BalanceDrift {
                account_id: cash.id,
                stored: dec!(75),
                expected: dec!(70),
                drift: dec!(5),
            }]
        );
    }
}
