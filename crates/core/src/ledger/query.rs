//! Read-side transaction queries.

use coinkeeper_shared::types::{TransactionId, UserId};
use tracing::warn;

use super::error::LedgerError;
use super::service::LedgerService;
use super::store::LedgerStore;
use super::types::{Category, EnrichedTransaction, Transaction, TransactionFilter};
use crate::category::CategoryDirectory;

/// Newest first; ties broken by creation time.
pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

impl<S: LedgerStore> LedgerService<S> {
    /// Lists matching transactions, newest first, with category metadata.
    pub async fn list_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<EnrichedTransaction>, LedgerError> {
        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let categories: Vec<Category> = self.load(user_id).await?;
        let directory = CategoryDirectory::new(&categories);

        let mut matching: Vec<Transaction> =
            transactions.into_iter().filter(|t| filter.matches(t)).collect();
        sort_newest_first(&mut matching);

        Ok(matching.into_iter().map(|t| directory.enrich(t)).collect())
    }

    /// Returns one transaction with category metadata.
    pub async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<EnrichedTransaction, LedgerError> {
        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let transaction = transactions
            .into_iter()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| LedgerError::not_found("Transaction", transaction_id))?;
        Ok(self.describe_transaction(user_id, transaction).await)
    }

    /// Attaches category metadata to a transaction.
    ///
    /// Used after a committed write, so it never fails: if categories cannot
    /// be read the transaction is described as uncategorized.
    pub async fn describe_transaction(&self, user_id: UserId, transaction: Transaction) -> EnrichedTransaction {
        let categories: Vec<Category> = match self.load(user_id).await {
            Ok(categories) => categories,
            Err(err) => {
                warn!(
                    %user_id,
                    transaction_id = %transaction.id,
                    error = %err,
                    "categories unavailable; describing as uncategorized"
                );
                Vec::new()
            }
        };
        CategoryDirectory::new(&categories).enrich(transaction)
    }
}
