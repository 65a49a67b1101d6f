//! Expense analytics.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use finquina_types::Expense;
use rust_decimal::Decimal;
use serde::Serialize;

/// Spending in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category name.
    pub name: String,
    /// Sum of amounts.
    pub value: Decimal,
}

/// Spending in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    /// `YYYY-MM`.
    pub month: String,
    /// Sum of amounts.
    pub amount: Decimal,
}

/// Aggregated spending figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseAnalytics {
    /// Totals per category, by name.
    pub by_category: Vec<CategoryTotal>,
    /// Totals per month, oldest first.
    pub by_month: Vec<MonthTotal>,
    /// Spending in the month of `now`.
    pub current_month_total: Decimal,
    /// Spending in the month before.
    pub last_month_total: Decimal,
    /// Spending over all time.
    pub total_invoiced: Decimal,
}

/// `YYYY-MM` key for a timestamp.
pub fn month_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}

/// Midnight UTC on the first day of the month containing `now`.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(now, |d| Utc.from_utc_datetime(&d))
}

/// Sum of expenses dated on or after the start of the current month.
pub fn monthly_spending(expenses: &[Expense], now: DateTime<Utc>) -> Decimal {
    let start = start_of_month(now);
    expenses
        .iter()
        .filter(|e| e.date >= start)
        .map(|e| e.amount)
        .sum()
}

/// Aggregate expenses relative to `now`.
pub fn expense_analytics(expenses: &[Expense], now: DateTime<Utc>) -> ExpenseAnalytics {
    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();

    for expense in expenses {
        *by_category.entry(expense.category.as_str()).or_default() += expense.amount;
        *by_month.entry(month_key(expense.date)).or_default() += expense.amount;
    }

    let current = month_key(now);
    let previous = start_of_month(now)
        .checked_sub_months(Months::new(1))
        .map(month_key)
        .unwrap_or_default();

    ExpenseAnalytics {
        current_month_total: by_month.get(&current).copied().unwrap_or_default(),
        last_month_total: by_month.get(&previous).copied().unwrap_or_default(),
        total_invoiced: expenses.iter().map(|e| e.amount).sum(),
        by_category: by_category
            .into_iter()
            .map(|(name, value)| CategoryTotal {
                name: name.to_owned(),
                value,
            })
            .collect(),
        by_month: by_month
            .into_iter()
            .map(|(month, amount)| MonthTotal { month, amount })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use finquina_types::ExpenseId;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn expense(id: i64, amount: i64, category: &str, date: DateTime<Utc>) -> Expense {
        Expense {
            id: ExpenseId(id),
            item: format!("item {id}"),
            amount: Decimal::new(amount, 2),
            category: category.to_owned(),
            date,
            shop: None,
        }
    }

    #[test]
    fn groups_by_category_and_month() {
        let expenses = [
            expense(1, 1050, "Semillas", at(2026, 10, 3)),
            expense(2, 2000, "Abono", at(2026, 9, 28)),
            expense(3, 450, "Semillas", at(2026, 8, 1)),
        ];
        let analytics = expense_analytics(&expenses, at(2026, 10, 19));

        assert_eq!(analytics.total_invoiced, Decimal::new(3500, 2));
        assert_eq!(analytics.current_month_total, Decimal::new(1050, 2));
        assert_eq!(analytics.last_month_total, Decimal::new(2000, 2));

        let months: Vec<_> = analytics.by_month.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, ["2026-08", "2026-09", "2026-10"]);

        let seeds = analytics.by_category.iter().find(|c| c.name == "Semillas");
        assert_eq!(seeds.map(|c| c.value), Some(Decimal::new(1500, 2)));
    }

    #[test]
    fn january_compares_with_december() {
        let expenses = [expense(1, 100, "Otros", at(2025, 12, 31))];
        let analytics = expense_analytics(&expenses, at(2026, 1, 5));
        assert_eq!(analytics.last_month_total, Decimal::new(100, 2));
        assert_eq!(analytics.current_month_total, Decimal::ZERO);
    }

    #[test]
    fn monthly_spending_counts_from_the_first() {
        let expenses = [
            expense(1, 500, "Otros", at(2026, 10, 1)),
            expense(2, 700, "Otros", at(2026, 9, 30)),
        ];
        assert_eq!(
            monthly_spending(&expenses, at(2026, 10, 19)),
            Decimal::new(500, 2)
        );
    }

    #[test]
    fn no_expenses_is_all_zero() {
        assert_eq!(expense_analytics(&[], at(2026, 1, 1)), ExpenseAnalytics::default());
    }
}
