//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` kept at a scale of two fractional
//! digits, so one minor unit is one cent.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Number of fractional digits every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Errors produced while interpreting monetary input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The text is not a decimal number.
    #[error("'{0}' is not a valid amount")]
    Malformed(String),

    /// More fractional digits than a minor unit can hold.
    #[error("amount {0} has more than {MONEY_SCALE} decimal places")]
    TooPrecise(Decimal),
}

/// Returns true if `amount` fits into whole minor units.
#[must_use]
pub fn has_valid_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Rescales an amount to exactly [`MONEY_SCALE`] fractional digits.
///
/// Callers must check [`has_valid_scale`] first; extra digits are rounded
/// half-even otherwise.
#[must_use]
pub fn normalize(amount: Decimal) -> Decimal {
    let mut value = amount.round_dp(MONEY_SCALE);
    value.rescale(MONEY_SCALE);
    value
}

/// Converts an amount to integer minor units.
///
/// Returns `None` when the amount has sub-cent digits or overflows `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    if !has_valid_scale(amount) {
        return None;
    }
    amount.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
}

/// True when `amount` is a whole number of cents within `i64` range.
///
/// This is the bound for any amount or balance a user may enter, so that
/// ledger sums stay far from the `Decimal` limit.
#[must_use]
pub fn fits_minor_units(amount: Decimal) -> bool {
    to_minor_units(amount).is_some()
}

/// Builds an amount from integer minor units.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

/// Parses textual user input such as `"1 250.50"` or `"-12,5"`.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let amount =
        Decimal::from_str(&cleaned).map_err(|_| MoneyError::Malformed(input.to_string()))?;

    if !has_valid_scale(amount) {
        return Err(MoneyError::TooPrecise(amount));
    }
    Ok(normalize(amount))
}
