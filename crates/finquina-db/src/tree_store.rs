//! Fruit tree persistence.

use finquina_types::{NewTree, Tree, TreeId, non_empty};

use crate::crop_store::like_pattern;
use crate::database::Database;
use crate::error::DbError;

/// Health label for trees registered without one.
pub const DEFAULT_TREE_HEALTH: &str = "Sano";

/// Operations on the `trees` table.
pub struct TreeStore<'a> {
    db: &'a Database,
}

impl<'a> TreeStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All trees in insertion order.
    pub async fn list(&self) -> Result<Vec<Tree>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, TreeRow>(
            r"SELECT id, name, planted_year, location, latitude, longitude, health, notes
              FROM trees
              ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Tree::from).collect())
    }

    /// Case-insensitive substring search over name and notes.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Tree>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, TreeRow>(
            r"SELECT id, name, planted_year, location, latitude, longitude, health, notes
              FROM trees
              WHERE name ILIKE $1 OR notes ILIKE $1
              ORDER BY id ASC
              LIMIT $2",
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Tree::from).collect())
    }

    /// Insert a tree. Health defaults to [`DEFAULT_TREE_HEALTH`].
    pub async fn insert(&self, new: &NewTree) -> Result<Tree, DbError> {
        let pool = self.db.pool()?;
        let health =
            non_empty(new.health.as_deref()).unwrap_or_else(|| DEFAULT_TREE_HEALTH.to_owned());
        let row = sqlx::query_as::<_, TreeRow>(
            r"INSERT INTO trees (name, planted_year, location, latitude, longitude, health, notes)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              RETURNING id, name, planted_year, location, latitude, longitude, health, notes",
        )
        .bind(new.name.trim())
        .bind(new.planted_year)
        .bind(non_empty(new.location.as_deref()))
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(health)
        .bind(non_empty(new.notes.as_deref()))
        .fetch_one(pool)
        .await?;

        tracing::info!(tree_id = row.id, name = %row.name, "Tree added");
        Ok(row.into())
    }

    /// Delete a tree.
    pub async fn delete(&self, id: TreeId) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("DELETE FROM trees WHERE id = $1")
            .bind(id.into_inner())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A row from the `trees` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TreeRow {
    /// Primary key.
    pub id: i64,
    /// Common name.
    pub name: String,
    /// Year planted.
    pub planted_year: Option<i32>,
    /// Location label.
    pub location: Option<String>,
    /// Map latitude.
    pub latitude: Option<f64>,
    /// Map longitude.
    pub longitude: Option<f64>,
    /// Health label.
    pub health: String,
    /// Notes.
    pub notes: Option<String>,
}

impl From<TreeRow> for Tree {
    fn from(row: TreeRow) -> Self {
        Self {
            id: TreeId(row.id),
            name: row.name,
            planted_year: row.planted_year,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            health: row.health,
            notes: row.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_list_is_empty_and_insert_unavailable() {
        let db = Database::offline("test");
        assert!(db.trees().list().await.is_ok_and(|v| v.is_empty()));

        let new = NewTree {
            name: "Manzano".to_owned(),
            ..NewTree::default()
        };
        assert!(db.trees().insert(&new).await.is_err_and(|e| e.is_unavailable()));
    }
}
