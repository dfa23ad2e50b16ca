//! Ledger error types.
//!
//! Every variant maps to one client-distinguishable kind with a stable code.
//! Storage details are carried for logging but are never part of
//! [`LedgerError::public_message`].

use thiserror::Error;
use coinkeeper_shared::types::{AccountId, CategoryId};

use super::balance::ReconcileError;
use super::store::StoreError;
use super::types::TransactionType;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Missing or malformed field, non-positive amount, unparseable date.
    #[error("{0}")]
    Validation(String),

    // ========== Reference Errors ==========
    /// Category is missing or belongs to the other type.
    #[error("Category {category_id} does not exist for {kind} transactions")]
    InvalidCategory {
        /// The referenced category.
        category_id: CategoryId,
        /// The type the transaction asked for.
        kind: TransactionType,
    },

    /// Account does not exist.
    #[error("Account {0} does not exist")]
    InvalidAccount(AccountId),

    // ========== Lookup Errors ==========
    /// Target of an update or delete does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `Transaction`.
        entity: &'static str,
        /// Requested identifier.
        id: String,
    },

    // ========== Uniqueness Errors ==========
    /// Another category of the same type already has this name.
    #[error("Category '{name}' already exists for {kind}")]
    DuplicateCategory {
        /// Category type.
        kind: TransactionType,
        /// Conflicting name.
        name: String,
    },

    /// Another account already has this name.
    #[error("An account named '{0}' already exists")]
    DuplicateAccountName(String),

    // ========== Deletion Guards ==========
    /// Category is still referenced by transactions.
    #[error("Category {category_id} is used by {transactions} transaction(s)")]
    CategoryInUse {
        /// The category.
        category_id: CategoryId,
        /// Number of referencing transactions.
        transactions: usize,
    },

    /// Account is still referenced by transactions.
    #[error("Account {account_id} is used by {transactions} transaction(s)")]
    AccountInUse {
        /// The account.
        account_id: AccountId,
        /// Number of referencing transactions.
        transactions: usize,
    },

    // ========== Consistency Errors ==========
    /// Balances could not be kept consistent; any partial change was rolled back.
    #[error("Balance reconciliation failed: {0}")]
    ReconciliationFailure(#[from] ReconcileError),

    // ========== Storage Errors ==========
    /// The ledger store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LedgerError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidCategory { .. } => "INVALID_CATEGORY",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateCategory { .. } => "DUPLICATE_CATEGORY",
            Self::DuplicateAccountName(_) => "DUPLICATE_ACCOUNT_NAME",
            Self::CategoryInUse { .. } => "CATEGORY_IN_USE",
            Self::AccountInUse { .. } => "ACCOUNT_IN_USE",
            Self::ReconciliationFailure(_) => "RECONCILIATION_FAILURE",
            Self::Storage(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCategory { .. } | Self::InvalidAccount(_) => 422,
            Self::NotFound { .. } => 404,
            Self::DuplicateCategory { .. }
            | Self::DuplicateAccountName(_)
            | Self::CategoryInUse { .. }
            | Self::AccountInUse { .. } => 409,
            Self::ReconciliationFailure(_) | Self::Storage(_) => 500,
        }
    }

    /// Message safe to show a client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => coinkeeper_shared::error::INTERNAL_MESSAGE.to_string(),
            Self::ReconciliationFailure(_) => {
                "Account balances could not be updated; no changes were saved".to_string()
            }
            other => other.to_string(),
        }
    }
}
