//! Expense persistence.

use chrono::{DateTime, Utc};
use finquina_types::{Expense, ExpenseId};
use rust_decimal::Decimal;

use crate::database::Database;
use crate::error::DbError;

/// Category for expenses logged without one.
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Otros";

/// A validated expense ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord<'r> {
    /// What was bought.
    pub item: &'r str,
    /// Amount in euros.
    pub amount: Decimal,
    /// Category.
    pub category: &'r str,
    /// Purchase date.
    pub date: DateTime<Utc>,
    /// Shop name.
    pub shop: Option<&'r str>,
}

/// Operations on the `expenses` table.
pub struct ExpenseStore<'a> {
    db: &'a Database,
}

impl<'a> ExpenseStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All expenses, newest first.
    pub async fn list(&self) -> Result<Vec<Expense>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r"SELECT id, item, amount, category, date, shop
              FROM expenses
              ORDER BY date DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Sum of expenses dated on or after `since`.
    pub async fn total_since(&self, since: DateTime<Utc>) -> Result<Decimal, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Decimal::ZERO);
        };
        let (total,): (Option<Decimal>,) =
            sqlx::query_as("SELECT SUM(amount) FROM expenses WHERE date >= $1")
                .bind(since)
                .fetch_one(pool)
                .await?;
        Ok(total.unwrap_or_default())
    }

    /// Insert an expense.
    pub async fn insert(&self, record: &ExpenseRecord<'_>) -> Result<Expense, DbError> {
        let pool = self.db.pool()?;
        let row = sqlx::query_as::<_, ExpenseRow>(
            r"INSERT INTO expenses (item, amount, category, date, shop)
              VALUES ($1, $2, $3, $4, $5)
              RETURNING id, item, amount, category, date, shop",
        )
        .bind(record.item)
        .bind(record.amount)
        .bind(record.category)
        .bind(record.date)
        .bind(record.shop)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            expense_id = row.id,
            amount = %row.amount,
            category = %row.category,
            "Expense logged"
        );
        Ok(row.into())
    }

    /// Delete an expense.
    pub async fn delete(&self, id: ExpenseId) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id.into_inner())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A row from the `expenses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseRow {
    /// Primary key.
    pub id: i64,
    /// What was bought.
    pub item: String,
    /// Amount in euros.
    pub amount: Decimal,
    /// Category.
    pub category: String,
    /// Purchase date.
    pub date: DateTime<Utc>,
    /// Shop name.
    pub shop: Option<String>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: ExpenseId(row.id),
            item: row.item,
            amount: row.amount,
            category: row.category,
            date: row.date,
            shop: row.shop,
        }
    }
}
