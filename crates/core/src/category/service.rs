//! Category management on the ledger service.

use tracing::info;
use coinkeeper_shared::types::{CategoryId, UserId};

use super::directory::CategoryDirectory;
use super::style::{normalize_color, normalize_icon};
use crate::ledger::error::LedgerError;
use crate::ledger::service::LedgerService;
use crate::ledger::store::LedgerStore;
use crate::ledger::types::{Category, CategoryUpdate, NewCategory, Transaction, TransactionType};
use crate::ledger::validation::validate_name;

impl<S: LedgerStore> LedgerService<S> {
    /// Lists categories sorted by name, optionally of one type.
    pub async fn list_categories(
        &self,
        user_id: UserId,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, LedgerError> {
        let mut categories: Vec<Category> = self.load(user_id).await?;
        categories.retain(|c| kind.is_none_or(|k| c.kind == k));
        categories.sort_by_cached_key(|c| c.name.to_lowercase());
        Ok(categories)
    }

    /// Creates a category; names are unique per type ignoring case.
    pub async fn create_category(&self, user_id: UserId, input: NewCategory) -> Result<Category, LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let name = validate_name(&input.name, "Category name")?;
        let mut categories: Vec<Category> = self.load(user_id).await?;
        CategoryDirectory::new(&categories).ensure_name_free(input.kind, &name, None)?;

        let category = Category {
            id: CategoryId::new(),
            kind: input.kind,
            name,
            color: normalize_color(input.color.as_deref()),
            icon: normalize_icon(input.icon.as_deref()),
        };
        categories.push(category.clone());
        self.save(user_id, &categories).await?;

        info!(%user_id, category_id = %category.id, kind = %category.kind, "category created");
        Ok(category)
    }

    /// Inline creation during transaction entry, with default color and icon.
    pub async fn quick_create_category(
        &self,
        user_id: UserId,
        kind: TransactionType,
        name: &str,
    ) -> Result<Category, LedgerError> {
        self.create_category(
            user_id,
            NewCategory {
                kind,
                name: name.to_string(),
                color: None,
                icon: None,
            },
        )
        .await
    }

    /// Renames or restyles a category. Omitted fields are kept.
    pub async fn update_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let mut categories: Vec<Category> = self.load(user_id).await?;
        let index = categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| LedgerError::not_found("Category", category_id))?;
        let mut category = categories[index].clone();

        if let Some(raw) = update.name.as_deref() {
            let name = validate_name(raw, "Category name")?;
            CategoryDirectory::new(&categories).ensure_name_free(category.kind, &name, Some(category_id))?;
            category.name = name;
        }
        if let Some(color) = update.color.as_deref() {
            category.color = normalize_color(Some(color));
        }
        if let Some(icon) = update.icon.as_deref() {
            category.icon = normalize_icon(Some(icon));
        }

        categories[index] = category.clone();
        self.save(user_id, &categories).await?;

        info!(%user_id, %category_id, "category updated");
        Ok(category)
    }

    /// Deletes a category no transaction references.
    pub async fn delete_category(&self, user_id: UserId, category_id: CategoryId) -> Result<(), LedgerError> {
        let _guard = self.locks().acquire(user_id).await;

        let mut categories: Vec<Category> = self.load(user_id).await?;
        let index = categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| LedgerError::not_found("Category", category_id))?;

        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let references = transactions.iter().filter(|t| t.category_id == category_id).count();
        if references > 0 {
            return Err(LedgerError::CategoryInUse {
                category_id,
                transactions: references,
            });
        }

        categories.remove(index);
        self.save(user_id, &categories).await?;

        info!(%user_id, %category_id, "category deleted");
        Ok(())
    }
}
