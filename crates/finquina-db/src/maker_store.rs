//! Maker model persistence.

use chrono::{DateTime, Utc};
use finquina_types::{MakerModel, MakerModelId, NewMakerModel, non_empty};

use crate::database::Database;
use crate::error::DbError;

/// Operations on the `maker_models` table.
pub struct MakerStore<'a> {
    db: &'a Database,
}

impl<'a> MakerStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All models, newest first.
    pub async fn list(&self) -> Result<Vec<MakerModel>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, MakerModelRow>(
            r"SELECT id, title, category, description, file_url, created_at
              FROM maker_models
              ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(MakerModel::from).collect())
    }

    /// Insert a model.
    pub async fn insert(&self, new: &NewMakerModel) -> Result<MakerModel, DbError> {
        let pool = self.db.pool()?;
        let row = sqlx::query_as::<_, MakerModelRow>(
            r"INSERT INTO maker_models (title, category, description, file_url)
              VALUES ($1, $2, $3, $4)
              RETURNING id, title, category, description, file_url, created_at",
        )
        .bind(new.title.trim())
        .bind(non_empty(new.category.as_deref()))
        .bind(non_empty(new.description.as_deref()))
        .bind(non_empty(new.file_url.as_deref()))
        .fetch_one(pool)
        .await?;

        tracing::info!(model_id = row.id, title = %row.title, "Maker model added");
        Ok(row.into())
    }
}

/// A row from the `maker_models` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MakerModelRow {
    /// Primary key.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Category label.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Model file URL.
    pub file_url: Option<String>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<MakerModelRow> for MakerModel {
    fn from(row: MakerModelRow) -> Self {
        Self {
            id: MakerModelId(row.id),
            title: row.title,
            category: row.category,
            description: row.description,
            file_url: row.file_url,
            created_at: row.created_at,
        }
    }
}
