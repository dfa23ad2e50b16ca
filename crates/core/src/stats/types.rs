//! Statistics and dashboard types.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use coinkeeper_shared::types::CategoryId;

use crate::ledger::error::LedgerError;
use crate::ledger::types::{Account, EnrichedTransaction};

/// Longest custom range accepted, in days.
pub const MAX_RANGE_DAYS: i64 = 3660;

/// Reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The last seven days including today.
    Week,
    /// From the first of the current month through today.
    Month,
    /// From January 1 through today.
    Year,
    /// Explicit inclusive range.
    Custom {
        /// First day.
        from: NaiveDate,
        /// Last day.
        to: NaiveDate,
    },
}

impl Period {
    /// Builds a period from query parameters.
    pub fn parse(kind: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, LedgerError> {
        match kind.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "custom" => match (from, to) {
                (Some(from), Some(to)) => Ok(Self::Custom { from, to }),
                _ => Err(LedgerError::validation(
                    "Custom period requires both 'from' and 'to'",
                )),
            },
            other => Err(LedgerError::validation(format!(
                "Unknown period '{other}'; expected week, month, year or custom"
            ))),
        }
    }

    /// Resolves the period to an inclusive day range ending relative to `today`.
    pub fn range(self, today: NaiveDate) -> Result<DateRange, LedgerError> {
        let (from, to) = match self {
            Self::Week => (today - Duration::days(6), today),
            Self::Month => (today.with_day(1).unwrap_or(today), today),
            Self::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                today,
            ),
            Self::Custom { from, to } => (from, to),
        };

        if from > to {
            return Err(LedgerError::validation("'from' must not be after 'to'"));
        }
        if (to - from).num_days() >= MAX_RANGE_DAYS {
            return Err(LedgerError::validation(format!(
                "Range must be shorter than {MAX_RANGE_DAYS} days"
            )));
        }
        Ok(DateRange { from, to })
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First day.
    pub from: NaiveDate,
    /// Last day.
    pub to: NaiveDate,
}

impl DateRange {
    /// Returns true if `day` falls inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// Every day from `from` through `to`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }
}

/// One category's share of a period total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name, or `Uncategorized`.
    pub name: String,
    /// Category color.
    pub color: String,
    /// Category icon.
    pub icon: String,
    /// Sum of amounts in the period.
    pub amount: Decimal,
    /// Share of the period total in percent, two decimals.
    pub percent: Decimal,
}

/// Income and expense totals for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    /// The day.
    pub date: NaiveDate,
    /// Income on that day.
    pub income: Decimal,
    /// Expense on that day.
    pub expense: Decimal,
}

/// Totals and breakdowns for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// The resolved range.
    pub range: DateRange,
    /// Sum of income.
    pub total_income: Decimal,
    /// Sum of expense.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub net_result: Decimal,
    /// Expense per category, largest first.
    pub expense_by_category: Vec<CategoryShare>,
    /// Income per category, largest first.
    pub income_by_category: Vec<CategoryShare>,
    /// One entry per day in range, zero-filled.
    pub daily: Vec<DailyTotals>,
}

/// Landing page summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Sum of stored account balances.
    pub total_balance: Decimal,
    /// Display currency code.
    pub currency: String,
    /// All accounts.
    pub accounts: Vec<Account>,
    /// Income so far this month.
    pub month_income: Decimal,
    /// Expense so far this month.
    pub month_expense: Decimal,
    /// Newest transactions.
    pub recent_transactions: Vec<EnrichedTransaction>,
}
