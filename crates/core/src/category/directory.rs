//! Read-only lookups over a user's categories.

use coinkeeper_shared::types::CategoryId;

use super::style::{DEFAULT_COLOR, DEFAULT_ICON};
use crate::ledger::error::LedgerError;
use crate::ledger::types::{Category, EnrichedTransaction, Transaction, TransactionType};

/// Label shown for transactions whose category no longer resolves.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Validates category references and supplies display metadata.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDirectory<'a> {
    categories: &'a [Category],
}

impl<'a> CategoryDirectory<'a> {
    /// Wraps a loaded category collection.
    #[must_use]
    pub const fn new(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    /// Looks up a category by ID regardless of type.
    #[must_use]
    pub fn get(&self, category_id: CategoryId) -> Option<&'a Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Returns the category if it exists and has the given type.
    #[must_use]
    pub fn resolve(&self, category_id: CategoryId, kind: TransactionType) -> Option<&'a Category> {
        self.get(category_id).filter(|c| c.kind == kind)
    }

    /// Case-insensitive name lookup within one type.
    #[must_use]
    pub fn find_by_name(&self, kind: TransactionType, name: &str) -> Option<&'a Category> {
        let wanted = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.kind == kind && c.name.to_lowercase() == wanted)
    }

    /// Fails with `DuplicateCategory` if `name` is taken within `kind`,
    /// ignoring the category being renamed.
    pub fn ensure_name_free(
        &self,
        kind: TransactionType,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<(), LedgerError> {
        match self.find_by_name(kind, name) {
            Some(existing) if Some(existing.id) != except => Err(LedgerError::DuplicateCategory {
                kind,
                name: name.trim().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Attaches display metadata. A dangling or mistyped category degrades to
    /// [`UNCATEGORIZED`] instead of failing.
    #[must_use]
    pub fn enrich(&self, transaction: Transaction) -> EnrichedTransaction {
        let (name, color, icon) = self.resolve(transaction.category_id, transaction.kind).map_or_else(
            || (UNCATEGORIZED.to_string(), DEFAULT_COLOR.to_string(), DEFAULT_ICON.to_string()),
            |c| (c.name.clone(), c.color.clone(), c.icon.clone()),
        );

        EnrichedTransaction {
            transaction,
            category_name: name,
            category_color: color,
            category_icon: icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use coinkeeper_shared::types::{AccountId, TransactionId};
    use rust_decimal_macros::dec;

    fn category(kind: TransactionType, name: &str) -> Category {
        Category {
            id: CategoryId::new(),
            kind,
            name: name.to_string(),
            color: "bg-green-500".to_string(),
            icon: "ShoppingCartIcon".to_string(),
        }
    }

    fn transaction(kind: TransactionType, category_id: CategoryId) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            kind,
            amount: dec!(10),
            category_id,
            account_id: AccountId::new(),
            date: Utc::now(),
            comment: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_checks_type() {
        let groceries = category(TransactionType::Expense, "Groceries");
        let categories = vec![groceries.clone()];
        let directory = CategoryDirectory::new(&categories);

        assert_eq!(
            directory.resolve(groceries.id, TransactionType::Expense),
            Some(&groceries)
        );
        assert_eq!(directory.resolve(groceries.id, TransactionType::Income), None);
        assert_eq!(directory.resolve(CategoryId::new(), TransactionType::Expense), None);
    }

    #[test]
    fn test_name_uniqueness_is_per_type_and_case_insensitive() {
        let groceries = category(TransactionType::Expense, "Groceries");
        let categories = vec![groceries.clone()];
        let directory = CategoryDirectory::new(&categories);

        assert!(matches!(
            directory.ensure_name_free(TransactionType::Expense, " groceries ", None),
            Err(LedgerError::DuplicateCategory { .. })
        ));
        assert!(
            directory
                .ensure_name_free(TransactionType::Income, "Groceries", None)
                .is_ok()
        );
        assert!(
            directory
                .ensure_name_free(TransactionType::Expense, "GROCERIES", Some(groceries.id))
                .is_ok()
        );
    }

    #[test]
    fn test_enrich_uses_category_metadata() {
        let salary = category(TransactionType::Income, "Salary");
        let categories = vec![salary.clone()];
        let directory = CategoryDirectory::new(&categories);

        let enriched = directory.enrich(transaction(TransactionType::Income, salary.id));
        assert_eq!(enriched.category_name, "Salary");
        assert_eq!(enriched.category_color, "bg-green-500");
        assert_eq!(enriched.category_icon, "ShoppingCartIcon");
    }

    #[test]
    fn test_enrich_falls_back_to_uncategorized() {
        let directory = CategoryDirectory::new(&[]);

        let enriched = directory.enrich(transaction(TransactionType::Expense, CategoryId::new()));
        assert_eq!(enriched.category_name, UNCATEGORIZED);
        assert_eq!(enriched.category_color, DEFAULT_COLOR);
        assert_eq!(enriched.category_icon, DEFAULT_ICON);
    }
}
