//! JSON document store on `OpenDAL`.
//!
//! Layout under the operator root:
//!
//! ```text
//! users.json
//! users/{user_id}/accounts.json
//! users/{user_id}/categories.json
//! users/{user_id}/transactions.json
//! ```
//!
//! Parsed documents are cached by key. Successful writes replace the cached
//! document; failed writes evict it.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use opendal::{ErrorKind, Operator};
use serde_json::Value;

use coinkeeper_core::auth::User;
use coinkeeper_core::ledger::store::{
    Collection, LedgerRecord, LedgerStore, StoreError, USERS_KEY, UserStore, collection_key,
};
use coinkeeper_shared::types::UserId;

use crate::codec;

/// Default cache capacity (number of documents).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cached documents (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Ledger and user store backed by JSON documents.
#[derive(Clone)]
pub struct JsonLedgerStore {
    operator: Operator,
    cache: Cache<String, Arc<Value>>,
}

impl std::fmt::Debug for JsonLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLedgerStore")
            .field("scheme", &self.operator.info().scheme())
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}

impl JsonLedgerStore {
    /// Creates a store with default cache settings.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self::with_cache(operator, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a store with custom cache configuration.
    #[must_use]
    pub fn with_cache(operator: Operator, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { operator, cache }
    }

    /// The underlying operator.
    #[must_use]
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Verifies that the backend is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.operator
            .check()
            .await
            .map_err(|e| StoreError::backend("/", e))
    }

    async fn read_document(
        &self,
        key: &str,
        collection: Option<Collection>,
    ) -> Result<Arc<Value>, StoreError> {
        if let Some(hit) = self.cache.get(key).await {
            return Ok(hit);
        }

        let bytes = match self.operator.read(key).await {
            Ok(buffer) => buffer.to_vec(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::trace!(key, "document missing, treating as empty");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read document");
                return Err(StoreError::backend(key, e));
            }
        };
        let parsed = Arc::new(codec::parse_document(key, collection, &bytes)?);

        // A concurrent write may have cached a newer document meanwhile.
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert(parsed)
            .await;
        Ok(entry.into_value())
    }

    async fn write_document(&self, key: String, value: Value) -> Result<(), StoreError> {
        let bytes = codec::render(&key, &value)?;
        if let Err(e) = self.operator.write(&key, bytes).await {
            tracing::error!(key = %key, error = %e, "failed to write document");
            self.cache.invalidate(&key).await;
            return Err(StoreError::backend(key, e));
        }
        tracing::debug!(key = %key, "document written");
        self.cache.insert(key, Arc::new(value)).await;
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    async fn load_all<T: LedgerRecord>(&self, user_id: UserId) -> Result<Vec<T>, StoreError> {
        let key = collection_key(user_id, T::COLLECTION);
        let value = self.read_document(&key, Some(T::COLLECTION)).await?;
        codec::decode(&key, &value)
    }

    async fn save_all<T: LedgerRecord>(
        &self,
        user_id: UserId,
        records: &[T],
    ) -> Result<(), StoreError> {
        let key = collection_key(user_id, T::COLLECTION);
        let value = codec::encode(&key, records)?;
        self.write_document(key, value).await
    }
}

impl UserStore for JsonLedgerStore {
    async fn load_users(&self) -> Result<Vec<User>, StoreError> {
        let value = self.read_document(USERS_KEY, None).await?;
        codec::decode(USERS_KEY, &value)
    }

    async fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        let value = codec::encode(USERS_KEY, users)?;
        self.write_document(USERS_KEY.to_string(), value).await
    }
}
