//! Period statistics and dashboard aggregation.
//!
//! All sums are decimal and saturate at the `Decimal` range instead of
//! panicking. Reads are not locked.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use coinkeeper_shared::types::{CategoryId, UserId};

use super::types::{CategoryShare, DailyTotals, Dashboard, DateRange, Period, PeriodSummary};
use crate::category::CategoryDirectory;
use crate::category::directory::UNCATEGORIZED;
use crate::category::style::{DEFAULT_COLOR, DEFAULT_ICON};
use crate::ledger::error::LedgerError;
use crate::ledger::query::sort_newest_first;
use crate::ledger::service::LedgerService;
use crate::ledger::store::LedgerStore;
use crate::ledger::types::{Account, Category, Transaction, TransactionType};

/// Default number of recent transactions on the dashboard.
pub const DEFAULT_RECENT: usize = 5;

/// Stateless aggregation functions.
pub struct StatsService;

fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

impl StatsService {
    /// Share of `part` in `total`, in percent rounded to two decimals.
    #[must_use]
    pub fn percent(part: Decimal, total: Decimal) -> Decimal {
        if total.is_zero() {
            return Decimal::ZERO;
        }
        part.checked_div(total)
            .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ZERO, |pct| pct.round_dp(2))
    }

    fn breakdown(
        transactions: &[&Transaction],
        kind: TransactionType,
        directory: CategoryDirectory<'_>,
    ) -> Vec<CategoryShare> {
        let mut totals: Vec<(CategoryId, Decimal)> = Vec::new();
        for t in transactions.iter().filter(|t| t.kind == kind) {
            match totals.iter_mut().find(|(id, _)| *id == t.category_id) {
                Some((_, sum)) => *sum = sum.saturating_add(t.amount),
                None => totals.push((t.category_id, t.amount)),
            }
        }
        let total = saturating_sum(totals.iter().map(|(_, amount)| *amount));

        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category_id, amount)| {
                let category = directory.resolve(category_id, kind);
                CategoryShare {
                    category_id,
                    name: category.map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone()),
                    color: category.map_or_else(|| DEFAULT_COLOR.to_string(), |c| c.color.clone()),
                    icon: category.map_or_else(|| DEFAULT_ICON.to_string(), |c| c.icon.clone()),
                    amount,
                    percent: Self::percent(amount, total),
                }
            })
            .collect();
        shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
        shares
    }

    /// Totals, per-category breakdowns, and a zero-filled daily series.
    #[must_use]
    pub fn summarize(range: DateRange, transactions: &[Transaction], categories: &[Category]) -> PeriodSummary {
        let directory = CategoryDirectory::new(categories);
        let in_range: Vec<&Transaction> =
            transactions.iter().filter(|t| range.contains(t.day())).collect();

        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut daily: Vec<DailyTotals> = range
            .days()
            .map(|date| DailyTotals {
                date,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            })
            .collect();

        for t in &in_range {
            let offset = usize::try_from((t.day() - range.from).num_days()).unwrap_or_default();
            let slot = daily.get_mut(offset);
            match t.kind {
                TransactionType::Income => {
                    total_income = total_income.saturating_add(t.amount);
                    if let Some(slot) = slot {
                        slot.income = slot.income.saturating_add(t.amount);
                    }
                }
                TransactionType::Expense => {
                    total_expense = total_expense.saturating_add(t.amount);
                    if let Some(slot) = slot {
                        slot.expense = slot.expense.saturating_add(t.amount);
                    }
                }
            }
        }

        PeriodSummary {
            range,
            total_income,
            total_expense,
            net_result: total_income.saturating_sub(total_expense),
            expense_by_category: Self::breakdown(&in_range, TransactionType::Expense, directory),
            income_by_category: Self::breakdown(&in_range, TransactionType::Income, directory),
            daily,
        }
    }

    /// Balances, this month's totals, and the newest transactions.
    #[must_use]
    pub fn dashboard(
        accounts: Vec<Account>,
        mut transactions: Vec<Transaction>,
        categories: &[Category],
        today: NaiveDate,
        recent: usize,
        currency: &str,
    ) -> Dashboard {
        let directory = CategoryDirectory::new(categories);
        let total_balance = saturating_sum(accounts.iter().map(|a| a.balance));

        let month = Period::Month.range(today).ok();
        let (mut month_income, mut month_expense) = (Decimal::ZERO, Decimal::ZERO);
        for t in transactions
            .iter()
            .filter(|t| month.is_some_and(|range| range.contains(t.day())))
        {
            match t.kind {
                TransactionType::Income => month_income = month_income.saturating_add(t.amount),
                TransactionType::Expense => month_expense = month_expense.saturating_add(t.amount),
            }
        }

        sort_newest_first(&mut transactions);
        let recent_transactions = transactions
            .into_iter()
            .take(recent)
            .map(|t| directory.enrich(t))
            .collect();

        Dashboard {
            total_balance,
            currency: currency.to_string(),
            accounts,
            month_income,
            month_expense,
            recent_transactions,
        }
    }
}

impl<S: LedgerStore> LedgerService<S> {
    /// Statistics for one period ending relative to `today`.
    pub async fn period_summary(
        &self,
        user_id: UserId,
        period: Period,
        today: NaiveDate,
    ) -> Result<PeriodSummary, LedgerError> {
        let range = period.range(today)?;
        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let categories: Vec<Category> = self.load(user_id).await?;
        Ok(StatsService::summarize(range, &transactions, &categories))
    }

    /// Dashboard with at most `recent` transactions.
    pub async fn dashboard(
        &self,
        user_id: UserId,
        today: NaiveDate,
        recent: usize,
        currency: &str,
    ) -> Result<Dashboard, LedgerError> {
        let accounts: Vec<Account> = self.load(user_id).await?;
        let transactions: Vec<Transaction> = self.load(user_id).await?;
        let categories: Vec<Category> = self.load(user_id).await?;
        Ok(StatsService::dashboard(
            accounts,
            transactions,
            &categories,
            today,
            recent,
            currency,
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use coinkeeper_shared::types::{AccountId, TransactionId};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn category(kind: TransactionType, name: &str) -> Category {
        Category {
            id: CategoryId::new(),
            kind,
            name: name.to_string(),
            color: "bg-red-500".to_string(),
            icon: "TagIcon".to_string(),
        }
    }

    fn txn(category: &Category, amount: Decimal, on: u32) -> Transaction {
        let date = Utc.with_ymd_and_hms(2025, 3, on, 10, 0, 0).unwrap();
        Transaction {
            id: TransactionId::new(),
            kind: category.kind,
            amount,
            category_id: category.id,
            account_id: AccountId::new(),
            date,
            comment: String::new(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_period_ranges() {
        let today = day(12);
        assert_eq!(Period::Week.range(today).unwrap().from, day(6));
        assert_eq!(Period::Month.range(today).unwrap().from, day(1));
        assert_eq!(
            Period::Year.range(today).unwrap().from,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert!(
            Period::Custom { from: day(5), to: day(4) }
                .range(today)
                .is_err()
        );
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(Period::parse("Week", None, None).unwrap(), Period::Week);
        assert_eq!(
            Period::parse("custom", Some(day(1)), Some(day(2))).unwrap(),
            Period::Custom { from: day(1), to: day(2) }
        );
        assert!(Period::parse("custom", Some(day(1)), None).is_err());
        assert!(Period::parse("decade", None, None).is_err());
    }

    #[test]
    fn test_summarize() {
        let food = category(TransactionType::Expense, "Food");
        let rent = category(TransactionType::Expense, "Rent");
        let salary = category(TransactionType::Income, "Salary");
        let categories = vec![food.clone(), rent.clone(), salary.clone()];
        let transactions = vec![
            txn(&food, dec!(100), 2),
            txn(&food, dec!(50), 3),
            txn(&rent, dec!(250), 3),
            txn(&salary, dec!(1000), 1),
            txn(&food, dec!(999), 20),
        ];
        let range = DateRange { from: day(1), to: day(7) };

        let summary = StatsService::summarize(range, &transactions, &categories);

        assert_eq!(summary.total_income, dec!(1000));
        assert_eq!(summary.total_expense, dec!(400));
        assert_eq!(summary.net_result, dec!(600));

        let names: Vec<&str> = summary.expense_by_category.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Food"]);
        assert_eq!(summary.expense_by_category[0].percent, dec!(62.5));
        assert_eq!(summary.expense_by_category[1].percent, dec!(37.5));

        assert_eq!(summary.daily.len(), 7);
        assert_eq!(summary.daily[0].income, dec!(1000));
        assert_eq!(summary.daily[2].expense, dec!(300));
        assert_eq!(summary.daily[6].expense, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_keeps_dangling_categories() {
        let gone = category(TransactionType::Expense, "Gone");
        let transactions = vec![txn(&gone, dec!(10), 1)];
        let range = DateRange { from: day(1), to: day(1) };

        let summary = StatsService::summarize(range, &transactions, &[]);
        assert_eq!(summary.expense_by_category[0].name, UNCATEGORIZED);
        assert_eq!(summary.expense_by_category[0].percent, dec!(100));
    }

    #[test]
    fn test_summarize_saturates_at_decimal_range() {
        let salary = category(TransactionType::Income, "Salary");
        let transactions = vec![txn(&salary, Decimal::MAX, 1), txn(&salary, Decimal::MAX, 1)];
        let range = DateRange { from: day(1), to: day(1) };

        let summary = StatsService::summarize(range, &transactions, &[salary]);
        assert_eq!(summary.total_income, Decimal::MAX);
        assert_eq!(summary.daily[0].income, Decimal::MAX);
        assert_eq!(summary.income_by_category[0].percent, dec!(100));
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(StatsService::percent(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(StatsService::percent(dec!(1), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_dashboard() {
        let food = category(TransactionType::Expense, "Food");
        let salary = category(TransactionType::Income, "Salary");
        let mut cash = Account::open("Cash".to_string(), dec!(100));
        cash.balance = dec!(70);
        let bank = Account::open("Bank".to_string(), dec!(-20));
        let transactions = vec![
            txn(&food, dec!(30), 2),
            txn(&salary, dec!(500), 10),
            txn(&food, dec!(5), 11),
        ];

        let dashboard = StatsService::dashboard(
            vec![cash, bank],
            transactions,
            &[food, salary],
            day(12),
            2,
            "KZT",
        );

        assert_eq!(dashboard.total_balance, dec!(50));
        assert_eq!(dashboard.month_income, dec!(500));
        assert_eq!(dashboard.month_expense, dec!(35));
        assert_eq!(dashboard.recent_transactions.len(), 2);
        assert_eq!(dashboard.recent_transactions[0].transaction.amount, dec!(5));
        assert_eq!(dashboard.recent_transactions[1].category_name, "Salary");
    }
}
