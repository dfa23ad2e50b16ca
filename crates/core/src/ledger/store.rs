//! Ledger store abstraction.
//!
//! Each user owns three collections (accounts, categories, transactions).
//! A store offers get-all/replace-all per collection and nothing finer:
//! no partial updates and no transactions spanning collections.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use coinkeeper_shared::types::UserId;

use super::types::{Account, Category, Transaction};
use crate::auth::User;

/// Per-user collection names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Accounts with their stored balances.
    Accounts,
    /// Income and expense categories.
    Categories,
    /// Transaction history.
    Transactions,
}

impl Collection {
    /// Stable collection name, also used as the document file stem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Categories => "categories",
            Self::Transactions => "transactions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type that lives in one per-user collection.
pub trait LedgerRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection holding records of this type.
    const COLLECTION: Collection;
}

impl LedgerRecord for Account {
    const COLLECTION: Collection = Collection::Accounts;
}

impl LedgerRecord for Category {
    const COLLECTION: Collection = Collection::Categories;
}

impl LedgerRecord for Transaction {
    const COLLECTION: Collection = Collection::Transactions;
}

/// Store failures. Messages may contain storage paths and must not reach clients.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not read or write a document.
    #[error("storage backend failed for '{key}': {message}")]
    Backend {
        /// Document key.
        key: String,
        /// Backend message.
        message: String,
    },

    /// A stored document could not be decoded.
    #[error("document '{key}' is corrupt: {message}")]
    Corrupt {
        /// Document key.
        key: String,
        /// Decoder message.
        message: String,
    },

    /// Records could not be encoded.
    #[error("failed to encode '{key}': {message}")]
    Encode {
        /// Document key.
        key: String,
        /// Encoder message.
        message: String,
    },
}

impl StoreError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Backend {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a corrupt document error.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create an encoding error.
    #[must_use]
    pub fn encode(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Encode {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Durable per-user collections.
///
/// `save_all` must be durable before its future resolves. A collection
/// that was never written loads as empty.
pub trait LedgerStore: Send + Sync {
    /// Loads every record of one collection.
    fn load_all<T: LedgerRecord>(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send;

    /// Replaces one collection with `records`.
    fn save_all<T: LedgerRecord>(
        &self,
        user_id: UserId,
        records: &[T],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Durable global user registry.
pub trait UserStore: Send + Sync {
    /// Loads all registered users.
    fn load_users(&self) -> impl Future<Output = Result<Vec<User>, StoreError>> + Send;

    /// Replaces the user registry.
    fn save_users(&self, users: &[User]) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Document key for a per-user collection.
#[must_use]
pub fn collection_key(user_id: UserId, collection: Collection) -> String {
    format!("users/{user_id}/{collection}.json")
}

/// Document key of the user registry.
pub const USERS_KEY: &str = "users.json";

/// In-process store holding JSON documents.
///
/// Documents pass through `serde_json` exactly as a file-backed store
/// would, so decoding problems surface in tests too.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    documents: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let documents = self
            .documents
            .lock()
            .map_err(|e| StoreError::backend(key, e))?;
        match documents.get(key) {
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| StoreError::corrupt(key, e))
            }
            None => Ok(Vec::new()),
        }
    }

    fn write<T: Serialize>(&self, key: String, records: &[T]) -> Result<(), StoreError> {
        let value = serde_json::to_value(records).map_err(|e| StoreError::encode(&key, e))?;
        self.documents
            .lock()
            .map_err(|e| StoreError::backend(&key, e))?
            .insert(key, value);
        Ok(())
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn load_all<T: LedgerRecord>(&self, user_id: UserId) -> Result<Vec<T>, StoreError> {
        self.read(&collection_key(user_id, T::COLLECTION))
    }

    async fn save_all<T: LedgerRecord>(
        &self,
        user_id: UserId,
        records: &[T],
    ) -> Result<(), StoreError> {
        self.write(collection_key(user_id, T::COLLECTION), records)
    }
}

impl UserStore for MemoryLedgerStore {
    async fn load_users(&self) -> Result<Vec<User>, StoreError> {
        self.read(USERS_KEY)
    }

    async fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.write(USERS_KEY.to_string(), users)
    }
}
