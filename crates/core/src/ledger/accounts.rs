//! Account management on the ledger service.
//!
//! Direct balance edits are a separate write path from reconciliation, but
//! they take the same per-user lock so they never interleave with a
//! transaction mutation.

use rust_decimal::Decimal;
use tracing::info;
use coinkeeper_shared::types::{AccountId, UserId, money};

use super::balance::{BalanceEngine, ReconcileError};
use super::error::LedgerError;
use super::service::LedgerService;
use super::store::LedgerStore;
use super::types::{Account, AccountUpdate, BalanceDrift, NewAccount, Transaction};
use super::validation::{validate_money, validate_name};

fn ensure_account_name_free(
    accounts: &[Account],
    name: &str,
    except: Option<AccountId>,
) -> Result<(), LedgerError> {
    let wanted = name.to_lowercase();
    let taken = accounts
        .iter()
        .any(|a| a.name.to_lowercase() == wanted && Some(a.id) != except);
    if taken {
        return Err(LedgerError::DuplicateAccountName(name.to_string()));
    }
    Ok(())
}

impl<S: LedgerStore> LedgerService<S> {
    /// Lists accounts in creation order.
    pub async fn list_accounts(&self, user_id: UserId) -> Result<Vec<Account>, LedgerError> {
        self.load(user_id).await
    }

    /// Returns one account.
    pub async fn get_account(&self, user_id: UserId, account_id: AccountId) -> Result<Account, LedgerError> {
        let accounts: Vec<Account> = self.load(user_id).await?;
        accounts
            .into_iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| LedgerError::not_found("Account", account_id))
    }

    /// Opens an account with `balance = initial_balance`.
    pub async fn create_account(&self, user_id: UserId, input: NewAccount) -> Result<Account, LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let name = validate_name(&input.name, "Account name")?;
        let initial_balance = validate_money(input.initial_balance, "Initial balance")?;

        let mut accounts: Vec<Account> = self.load(user_id).await?;
        ensure_account_name_free(&accounts, &name, None)?;

        let account = Account::open(name, initial_balance);
        accounts.push(account.clone());
        self.save(user_id, &accounts).await?;

        info!(%user_id, account_id = %account.id, "account created");
        Ok(account)
    }

    /// Applies an owner-initiated edit.
    ///
    /// `balance_adjustment` shifts the initial and the current balance
    /// together. `initial_balance` replaces the opening balance and rebuilds
    /// the current balance from history.
    pub async fn update_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
        update: AccountUpdate,
    ) -> Result<Account, LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let mut accounts: Vec<Account> = self.load(user_id).await?;
        let index = accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| LedgerError::not_found("Account", account_id))?;

        let mut account = accounts[index].clone();

        if let Some(raw) = update.name.as_deref() {
            let name = validate_name(raw, "Account name")?;
            ensure_account_name_free(&accounts, &name, Some(account_id))?;
            account.name = name;
        }

        if let Some(initial_balance) = update.initial_balance {
            let initial_balance = validate_money(initial_balance, "Initial balance")?;
            let transactions: Vec<Transaction> = self.load(user_id).await?;
            account.initial_balance = initial_balance;
            account.balance = BalanceEngine::recompute(account_id, initial_balance, &transactions)?;
        }

        if let Some(adjustment) = update.balance_adjustment {
            let adjustment = validate_money(adjustment, "Balance adjustment")?;
            let out_of_range = || LedgerError::validation("Balance adjustment is out of range");
            account.initial_balance = account
                .initial_balance
                .checked_add(adjustment)
                .filter(|v| money::fits_minor_units(*v))
                .ok_or_else(out_of_range)?;
            account.balance = account
                .balance
                .checked_add(adjustment)
                .ok_or_else(out_of_range)?;
        }

        if account == accounts[index] {
            return Ok(account);
        }

        accounts[index] = account.clone();
        self.save(user_id, &accounts).await?;

        info!(%user_id, %account_id, balance = %account.balance, "account updated");
        Ok(account)
    }

    /// Deletes an account that no transaction references.
    pub async fn delete_account(&self, user_id: UserId, account_id: AccountId) -> Result<(), LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let mut accounts: Vec<Account> = self.load(user_id).await?;
        let index = accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| LedgerError::not_found("Account", account_id))?;

        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let references = transactions.iter().filter(|t| t.account_id == account_id).count();
        if references > 0 {
            return Err(LedgerError::AccountInUse {
                account_id,
                transactions: references,
            });
        }

        accounts.remove(index);
        self.save(user_id, &accounts).await?;

        info!(%user_id, %account_id, "account deleted");
        Ok(())
    }

    /// Repairs one account's stored balance from its full history.
    pub async fn recompute_account(&self, user_id: UserId, account_id: AccountId) -> Result<Account, LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let mut accounts: Vec<Account> = self.load(user_id).await?;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| LedgerError::not_found("Account", account_id))?;

        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let expected = BalanceEngine::recompute(account_id, account.initial_balance, &transactions)?;
        let drift = account
            .balance
            .checked_sub(expected)
            .ok_or(ReconcileError::Overflow(account_id))?;
        if drift == Decimal::ZERO {
            return Ok(account.clone());
        }

        account.balance = expected;
        let repaired = account.clone();
        self.save(user_id, &accounts).await?;

        info!(%user_id, %account_id, %drift, "account balance repaired");
        Ok(repaired)
    }

    /// Reports stored versus expected balance for every account.
    pub async fn audit_balances(&self, user_id: UserId) -> Result<Vec<BalanceDrift>, LedgerError> {
        let accounts: Vec<Account> = self.load(user_id).await?;
        let transactions: Vec<Transaction> = self.load(user_id).await?;
        Ok(BalanceEngine::audit(&accounts, &transactions)?)
    }
}
