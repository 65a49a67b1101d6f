//! Inventory persistence.
//!
//! Quantities are never stored negative: inserts clamp at zero and the
//! action layer clamps adjustments before writing.

use chrono::{DateTime, Utc};
use finquina_types::{NewResource, ParseEnumError, Resource, ResourceId};
use rust_decimal::Decimal;

use crate::crop_store::like_pattern;
use crate::database::Database;
use crate::error::DbError;

/// Operations on the `resources` table.
pub struct ResourceStore<'a> {
    db: &'a Database,
}

impl<'a> ResourceStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All resources, by name.
    pub async fn list(&self) -> Result<Vec<Resource>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, ResourceRow>(
            r"SELECT id, name, category, quantity, unit, min_stock, updated_at
              FROM resources
              ORDER BY name ASC, id ASC",
        )
        .fetch_all(pool)
        .await?;
        collect(rows)
    }

    /// Resources at or below their alert threshold.
    pub async fn low_stock(&self) -> Result<Vec<Resource>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, ResourceRow>(
            r"SELECT id, name, category, quantity, unit, min_stock, updated_at
              FROM resources
              WHERE quantity <= min_stock
              ORDER BY name ASC, id ASC",
        )
        .fetch_all(pool)
        .await?;
        collect(rows)
    }

    /// Look up a resource by id.
    pub async fn find(&self, id: ResourceId) -> Result<Option<Resource>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ResourceRow>(
            r"SELECT id, name, category, quantity, unit, min_stock, updated_at
              FROM resources
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Resource::try_from).transpose()?)
    }

    /// Case-insensitive substring search over name and category.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Resource>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, ResourceRow>(
            r"SELECT id, name, category, quantity, unit, min_stock, updated_at
              FROM resources
              WHERE name ILIKE $1 OR category ILIKE $1
              ORDER BY name ASC, id ASC
              LIMIT $2",
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(pool)
        .await?;
        collect(rows)
    }

    /// Insert a resource, clamping a negative quantity to zero.
    pub async fn insert(&self, new: &NewResource, now: DateTime<Utc>) -> Result<Resource, DbError> {
        let pool = self.db.pool()?;
        let row = sqlx::query_as::<_, ResourceRow>(
            r"INSERT INTO resources (name, category, quantity, unit, min_stock, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6)
              RETURNING id, name, category, quantity, unit, min_stock, updated_at",
        )
        .bind(new.name.trim())
        .bind(new.category.as_str())
        .bind(new.quantity.max(Decimal::ZERO))
        .bind(new.unit.trim())
        .bind(new.min_stock.max(Decimal::ZERO))
        .bind(now)
        .fetch_one(pool)
        .await?;

        tracing::info!(resource_id = row.id, name = %row.name, "Resource added");
        Ok(Resource::try_from(row)?)
    }

    /// Overwrite the stored quantity. Returns `None` when absent.
    pub async fn set_quantity(
        &self,
        id: ResourceId,
        quantity: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Option<Resource>, DbError> {
        let pool = self.db.pool()?;
        let row = sqlx::query_as::<_, ResourceRow>(
            r"UPDATE resources SET quantity = $2, updated_at = $3
              WHERE id = $1
              RETURNING id, name, category, quantity, unit, min_stock, updated_at",
        )
        .bind(id.into_inner())
        .bind(quantity.max(Decimal::ZERO))
        .bind(now)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Resource::try_from).transpose()?)
    }

    /// Delete a resource.
    pub async fn delete(&self, id: ResourceId) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id.into_inner())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn collect(rows: Vec<ResourceRow>) -> Result<Vec<Resource>, DbError> {
    rows.into_iter()
        .map(Resource::try_from)
        .collect::<Result<_, _>>()
        .map_err(DbError::from)
}

/// A row from the `resources` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResourceRow {
    /// Primary key.
    pub id: i64,
    /// Item name.
    pub name: String,
    /// Category as text.
    pub category: String,
    /// Units in stock.
    pub quantity: Decimal,
    /// Unit label.
    pub unit: String,
    /// Alert threshold.
    pub min_stock: Decimal,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ResourceRow> for Resource {
    type Error = ParseEnumError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ResourceId(row.id),
            name: row.name,
            category: row.category.parse()?,
            quantity: row.quantity,
            unit: row.unit,
            min_stock: row.min_stock,
            updated_at: row.updated_at,
        })
    }
}
