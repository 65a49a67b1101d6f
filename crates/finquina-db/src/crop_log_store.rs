//! Journal entry persistence.
//!
//! Entries always belong to a crop; the foreign key cascades on crop
//! deletion. Feed queries join the crop name in.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use finquina_types::{CropId, CropLog, CropLogEntry, CropLogId, NewCropLog};

use crate::database::Database;
use crate::error::DbError;

/// Operations on the `crop_logs` table.
pub struct CropLogStore<'a> {
    db: &'a Database,
}

impl<'a> CropLogStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Look up an entry by id.
    pub async fn find(&self, id: CropLogId) -> Result<Option<CropLog>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, CropLogRow>(
            r"SELECT id, crop_id, date, created_at, image_url, note, ai_analysis
              FROM crop_logs
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(pool)
        .await?;
        Ok(row.map(CropLog::from))
    }

    /// Entries for one crop, newest observation first.
    pub async fn for_crop(&self, crop_id: CropId) -> Result<Vec<CropLog>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, CropLogRow>(
            r"SELECT id, crop_id, date, created_at, image_url, note, ai_analysis
              FROM crop_logs
              WHERE crop_id = $1
              ORDER BY date DESC, id DESC",
        )
        .bind(crop_id.into_inner())
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CropLog::from).collect())
    }

    /// Most recently created entries with their crop names.
    pub async fn recent(&self, limit: i64) -> Result<Vec<CropLogEntry>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, CropLogEntryRow>(
            r"SELECT l.id, l.crop_id, l.date, l.created_at, l.image_url, l.note, l.ai_analysis,
                     c.name AS crop_name
              FROM crop_logs l
              JOIN crops c ON c.id = l.crop_id
              ORDER BY l.created_at DESC, l.id DESC
              LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CropLogEntry::from).collect())
    }

    /// Every entry with its crop name, newest observation first.
    pub async fn all(&self) -> Result<Vec<CropLogEntry>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, CropLogEntryRow>(
            r"SELECT l.id, l.crop_id, l.date, l.created_at, l.image_url, l.note, l.ai_analysis,
                     c.name AS crop_name
              FROM crop_logs l
              JOIN crops c ON c.id = l.crop_id
              ORDER BY l.date DESC, l.id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CropLogEntry::from).collect())
    }

    /// The newest entry of every crop that has one, keyed by crop.
    pub async fn latest_per_crop(&self) -> Result<HashMap<CropId, CropLog>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(HashMap::new());
        };
        let rows = sqlx::query_as::<_, CropLogRow>(
            r"SELECT DISTINCT ON (crop_id) id, crop_id, date, created_at, image_url, note, ai_analysis
              FROM crop_logs
              ORDER BY crop_id, date DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| (CropId(row.crop_id), CropLog::from(row)))
            .collect())
    }

    /// Insert an entry. The crop must exist.
    pub async fn insert(&self, new: &NewCropLog) -> Result<CropLog, DbError> {
        let pool = self.db.pool()?;
        let row = sqlx::query_as::<_, CropLogRow>(
            r"INSERT INTO crop_logs (crop_id, date, image_url, note, ai_analysis)
              VALUES ($1, $2, $3, $4, $5)
              RETURNING id, crop_id, date, created_at, image_url, note, ai_analysis",
        )
        .bind(new.crop_id.into_inner())
        .bind(new.date)
        .bind(new.image_url.as_deref())
        .bind(new.note.as_deref())
        .bind(new.ai_analysis.as_deref())
        .fetch_one(pool)
        .await?;

        tracing::info!(log_id = row.id, crop_id = row.crop_id, "Journal entry stored");
        Ok(row.into())
    }

    /// Delete an entry.
    pub async fn delete(&self, id: CropLogId) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("DELETE FROM crop_logs WHERE id = $1")
            .bind(id.into_inner())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A row from the `crop_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CropLogRow {
    /// Primary key.
    pub id: i64,
    /// Owning crop.
    pub crop_id: i64,
    /// Observation date.
    pub date: DateTime<Utc>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Photo URL.
    pub image_url: Option<String>,
    /// User note.
    pub note: Option<String>,
    /// Formatted AI analysis.
    pub ai_analysis: Option<String>,
}

impl From<CropLogRow> for CropLog {
    fn from(row: CropLogRow) -> Self {
        Self {
            id: CropLogId(row.id),
            crop_id: CropId(row.crop_id),
            date: row.date,
            created_at: row.created_at,
            image_url: row.image_url,
            note: row.note,
            ai_analysis: row.ai_analysis,
        }
    }
}

/// A journal row joined with its crop name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CropLogEntryRow {
    /// The entry columns.
    #[sqlx(flatten)]
    pub log: CropLogRow,
    /// Name of the owning crop.
    pub crop_name: String,
}

impl From<CropLogEntryRow> for CropLogEntry {
    fn from(row: CropLogEntryRow) -> Self {
        Self {
            log: row.log.into(),
            crop_name: row.crop_name,
        }
    }
}
