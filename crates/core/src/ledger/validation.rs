//! Field validation for ledger inputs.
//!
//! Local checks (type, amount, date, names) fail with `Validation`.
//! Reference checks fail with `InvalidCategory` or `InvalidAccount`.
//! Nothing here touches the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use coinkeeper_shared::types::money;

use super::error::LedgerError;
use super::types::{Account, TransactionFields, TransactionInput, TransactionType};
use crate::category::CategoryDirectory;

/// Longest accepted account or category name.
pub const MAX_NAME_LEN: usize = 60;

/// Longest accepted transaction comment.
pub const MAX_COMMENT_LEN: usize = 500;

/// Parses `income` / `expense`.
pub fn parse_kind(raw: &str) -> Result<TransactionType, LedgerError> {
    raw.parse().map_err(LedgerError::Validation)
}

/// A transaction amount must be positive with at most two decimals.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Amount must be a positive number"));
    }
    validate_money(amount, "Amount")
}

/// A signed balance with at most two decimals that fits `i64` cents.
pub fn validate_money(amount: Decimal, field: &str) -> Result<Decimal, LedgerError> {
    if !money::has_valid_scale(amount) {
        return Err(LedgerError::validation(format!(
            "{field} must have at most {} decimal places",
            money::MONEY_SCALE
        )));
    }
    if !money::fits_minor_units(amount) {
        return Err(LedgerError::validation(format!("{field} is too large")));
    }
    Ok(money::normalize(amount))
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (UTC) or `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, LedgerError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| LedgerError::validation(format!("Invalid date '{raw}'")))
}

/// Trims a display name and enforces non-empty and length limits.
pub fn validate_name(raw: &str, field: &str) -> Result<String, LedgerError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LedgerError::validation(format!("{field} is required")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Validates a transaction payload against the user's categories and accounts.
pub fn validate_transaction(
    input: &TransactionInput,
    categories: CategoryDirectory<'_>,
    accounts: &[Account],
) -> Result<TransactionFields, LedgerError> {
    let kind = parse_kind(&input.kind)?;
    let amount = validate_amount(input.amount)?;
    let date = parse_date(&input.date)?;

    let comment = input.comment.as_deref().unwrap_or_default().trim().to_string();
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(LedgerError::validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }

    if categories.resolve(input.category_id, kind).is_none() {
        return Err(LedgerError::InvalidCategory {
            category_id: input.category_id,
            kind,
        });
    }
    if !accounts.iter().any(|a| a.id == input.account_id) {
        return Err(LedgerError::InvalidAccount(input.account_id));
    }

    Ok(TransactionFields {
        kind,
        amount,
        category_id: input.category_id,
        account_id: input.account_id,
        date,
        comment,
    })
}
