//! Personal ledger: accounts, transactions, and balance consistency.
//!
//! This module implements the core ledger functionality:
//! - Domain types for accounts, categories, and transactions
//! - Balance reconciliation (incremental deltas plus full recompute)
//! - The transaction lifecycle with compensating rollback
//! - Account management and balance audits
//! - Field validation
//! - The ledger store abstraction and per-user write locks

pub mod accounts;
pub mod balance;
pub mod error;
pub mod locks;
pub mod query;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod testing;

pub use balance::{BalanceDelta, BalanceEngine, ReconcileError};
pub use error::LedgerError;
pub use locks::UserLocks;
pub use service::LedgerService;
pub use store::{
    Collection, LedgerRecord, LedgerStore, MemoryLedgerStore, StoreError, USERS_KEY, UserStore,
    collection_key,
};
pub use types::{
    Account, AccountUpdate, BalanceDrift, Category, CategoryUpdate, EnrichedTransaction,
    NewAccount, NewCategory, Transaction, TransactionFields, TransactionFilter, TransactionInput,
    TransactionType,
};
