//! Document storage for Coinkeeper ledgers.
//!
//! This crate provides:
//! - An `OpenDAL` operator built from [`StorageProvider`] settings
//! - [`JsonLedgerStore`], one JSON document per user collection with a `moka` read cache
//! - Decoding of legacy document layouts

pub mod codec;
pub mod error;
pub mod operator;
pub mod store;

pub use error::StorageError;
pub use operator::build_operator;
pub use store::JsonLedgerStore;

use coinkeeper_shared::config::StorageConfig;

/// Opens the configured document store.
///
/// # Errors
///
/// Returns an error if the storage provider cannot be initialized.
pub fn connect(config: &StorageConfig) -> Result<JsonLedgerStore, StorageError> {
    let operator = build_operator(&config.provider)?;
    Ok(JsonLedgerStore::with_cache(
        operator,
        config.cache_capacity,
        config.cache_ttl_secs,
    ))
}
