//! Errors raised while opening a ledger store.

use thiserror::Error;

/// The storage provider could not be opened.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The configured provider cannot be opened as given.
    #[error("cannot open ledger storage: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Wraps a configuration problem.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        Self::configuration(err.to_string())
    }
}
