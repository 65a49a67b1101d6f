//! Expense actions.

use chrono::Utc;
use finquina_agro::{ExpenseAnalytics, expense_analytics};
use finquina_db::{DEFAULT_EXPENSE_CATEGORY, ExpenseRecord};
use finquina_types::{Expense, ExpenseId, NewExpense, non_empty};

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, validate, written};
use crate::revalidate::{ANALYTICS, EXPENSES, HOME};

impl Farm {
    /// All expenses, newest first.
    pub async fn list_expenses(&self) -> Vec<Expense> {
        read_or_default("list_expenses", self.db.expenses().list().await)
    }

    /// Log an expense. Category defaults to `Otros`, date to now.
    pub async fn add_expense(&self, new: &NewExpense) -> Result<Option<Expense>, ActionError> {
        validate(new)?;
        let item = new.item.trim();
        if item.is_empty() {
            return Err(ActionError::Invalid("Item y cantidad son requeridos".to_owned()));
        }
        let category = non_empty(new.category.as_deref());
        let shop = non_empty(new.shop.as_deref());
        let record = ExpenseRecord {
            item,
            amount: new.amount,
            category: category.as_deref().unwrap_or(DEFAULT_EXPENSE_CATEGORY),
            date: new.date.unwrap_or_else(Utc::now),
            shop: shop.as_deref(),
        };
        let expense = written("add_expense", self.db.expenses().insert(&record).await);
        if expense.is_some() {
            self.revalidate(&[EXPENSES, HOME, ANALYTICS]);
        }
        Ok(expense)
    }

    /// Delete an expense.
    pub async fn delete_expense(&self, id: ExpenseId) -> bool {
        let deleted =
            written("delete_expense", self.db.expenses().delete(id).await).unwrap_or(false);
        if deleted {
            self.revalidate(&[EXPENSES, HOME, ANALYTICS]);
        }
        deleted
    }

    /// Totals by category and month, this month and last month.
    pub async fn expense_analytics(&self) -> ExpenseAnalytics {
        expense_analytics(&self.list_expenses().await, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::testing::offline_farm;

    use super::*;

    #[tokio::test]
    async fn blank_item_is_rejected() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let expense = NewExpense {
            item: "   ".to_owned(),
            amount: Decimal::new(1250, 2),
            ..NewExpense::default()
        };
        assert!(matches!(
            farm.add_expense(&expense).await,
            Err(ActionError::Invalid(ref m)) if m == "Item y cantidad son requeridos"
        ));
    }

    #[tokio::test]
    async fn offline_analytics_are_zero() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let analytics = farm.expense_analytics().await;
        assert!(analytics.by_category.is_empty());
        assert_eq!(analytics.total_invoiced, Decimal::ZERO);
    }
}
