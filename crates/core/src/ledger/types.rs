//! Domain types for accounts, categories, and transactions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use coinkeeper_shared::types::{AccountId, CategoryId, TransactionId};

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in; adds to the account balance.
    Income,
    /// Money going out; subtracts from the account balance.
    Expense,
}

impl TransactionType {
    /// Returns the signed effect of `amount` under this type.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("type must be 'income' or 'expense', got '{s}'")),
        }
    }
}

/// A named money container with a running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Display name, unique per user ignoring case.
    pub name: String,
    /// Opening balance set by the owner.
    pub initial_balance: Decimal,
    /// Stored running balance.
    pub balance: Decimal,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Opens a new account whose balance equals its initial balance.
    #[must_use]
    pub fn open(name: String, initial_balance: Decimal) -> Self {
        Self {
            id: AccountId::new(),
            name,
            initial_balance,
            balance: initial_balance,
            created_at: Utc::now(),
        }
    }
}

/// An income or expense label with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Which transactions may use this category.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Display name, unique per user within its type ignoring case.
    pub name: String,
    /// Palette token such as `bg-green-500`.
    pub color: String,
    /// Icon name.
    pub icon: String,
}

/// A single dated money movement on one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Positive amount.
    pub amount: Decimal,
    /// Category of the same type.
    pub category_id: CategoryId,
    /// Account the money moved on.
    pub account_id: AccountId,
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Free-form note.
    #[serde(default)]
    pub comment: String,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a new transaction from validated fields.
    #[must_use]
    pub fn record(fields: TransactionFields, now: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            kind: fields.kind,
            amount: fields.amount,
            category_id: fields.category_id,
            account_id: fields.account_id,
            date: fields.date,
            comment: fields.comment,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy carrying `fields`, keeping identity and creation time.
    #[must_use]
    pub fn revise(&self, fields: TransactionFields, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            kind: fields.kind,
            amount: fields.amount,
            category_id: fields.category_id,
            account_id: fields.account_id,
            date: fields.date,
            comment: fields.comment,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Effect on the account balance: `+amount` for income, `-amount` for expense.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Calendar day of the movement (UTC).
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Raw transaction payload as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// `income` or `expense`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount; accepts JSON numbers and strings.
    pub amount: Decimal,
    /// Category reference.
    pub category_id: CategoryId,
    /// Account reference.
    pub account_id: AccountId,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub date: String,
    /// Optional note.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Transaction fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    /// Income or expense.
    pub kind: TransactionType,
    /// Positive amount at money scale.
    pub amount: Decimal,
    /// Category reference, checked against `kind`.
    pub category_id: CategoryId,
    /// Existing account.
    pub account_id: AccountId,
    /// Parsed timestamp.
    pub date: DateTime<Utc>,
    /// Trimmed note.
    pub comment: String,
}

/// Transaction plus the category metadata a client needs to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransaction {
    /// The stored transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Category name, or `Uncategorized`.
    pub category_name: String,
    /// Category color.
    pub category_color: String,
    /// Category icon.
    pub category_icon: String,
}

/// Filters for listing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Only this type.
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// Only this account.
    pub account_id: Option<AccountId>,
    /// Only this category.
    pub category_id: Option<CategoryId>,
    /// Earliest day.
    pub from: Option<NaiveDate>,
    /// Latest day.
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Returns true if `transaction` passes every set filter.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let day = transaction.day();
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self.account_id.is_none_or(|id| transaction.account_id == id)
            && self.category_id.is_none_or(|id| transaction.category_id == id)
            && self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
    }
}

/// Payload for opening an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Opening balance; zero when omitted.
    #[serde(default)]
    pub initial_balance: Decimal,
}

/// Owner-initiated account edit. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    /// New display name.
    pub name: Option<String>,
    /// Signed shift applied to both the initial and the current balance.
    pub balance_adjustment: Option<Decimal>,
    /// New opening balance; the current balance is recomputed from history.
    pub initial_balance: Option<Decimal>,
}

/// Payload for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Display name.
    pub name: String,
    /// Palette token or hex color.
    #[serde(default)]
    pub color: Option<String>,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Category edit. The type is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New icon.
    pub icon: Option<String>,
}

/// Stored vs. expected balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDrift {
    /// Account ID.
    pub account_id: AccountId,
    /// Balance currently stored.
    pub stored: Decimal,
    /// Initial balance plus the signed sum of its transactions.
    pub expected: Decimal,
    /// `stored - expected`; zero when consistent.
    pub drift: Decimal,
}
