//! Crop persistence.

use chrono::{DateTime, Utc};
use finquina_types::{Crop, CropId, CropStatus, CropUpdate, NewCrop, ParseEnumError, non_empty};

use crate::database::Database;
use crate::error::DbError;

/// Column list shared by every crop query.
const CROP_COLUMNS: &str = "id, name, variety, status, planted_at, harvest_date, location, bed, \
                            row_label, image_url, latitude, longitude, notes";

/// Operations on the `crops` table.
pub struct CropStore<'a> {
    db: &'a Database,
}

impl<'a> CropStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All crops, most recently planted first.
    pub async fn list(&self) -> Result<Vec<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!("SELECT {CROP_COLUMNS} FROM crops ORDER BY planted_at DESC");
        let rows = sqlx::query_as::<_, CropRow>(&sql).fetch_all(pool).await?;
        collect(rows)
    }

    /// Crops in a given state, most recently planted first.
    pub async fn list_by_status(
        &self,
        status: CropStatus,
        limit: Option<i64>,
    ) -> Result<Vec<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {CROP_COLUMNS} FROM crops WHERE status = $1 \
             ORDER BY planted_at DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, CropRow>(&sql)
            .bind(status.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Number of crops in a given state.
    pub async fn count_by_status(&self, status: CropStatus) -> Result<i64, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(0);
        };
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM crops WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Look up a crop by id.
    pub async fn find(&self, id: CropId) -> Result<Option<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(None);
        };
        let sql = format!("SELECT {CROP_COLUMNS} FROM crops WHERE id = $1");
        let row = sqlx::query_as::<_, CropRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Crop::try_from).transpose()?)
    }

    /// The crop with the lowest id, if any.
    pub async fn first(&self) -> Result<Option<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(None);
        };
        let sql = format!("SELECT {CROP_COLUMNS} FROM crops ORDER BY id ASC LIMIT 1");
        let row = sqlx::query_as::<_, CropRow>(&sql)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Crop::try_from).transpose()?)
    }

    /// Planted crops sharing bed and row with `crop`, excluding itself.
    pub async fn neighbours(&self, crop: &Crop) -> Result<Vec<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {CROP_COLUMNS} FROM crops \
             WHERE bed IS NOT DISTINCT FROM $1 \
               AND row_label IS NOT DISTINCT FROM $2 \
               AND id <> $3 AND status = $4 \
             ORDER BY planted_at DESC"
        );
        let rows = sqlx::query_as::<_, CropRow>(&sql)
            .bind(crop.bed.as_deref())
            .bind(crop.row.as_deref())
            .bind(crop.id.into_inner())
            .bind(CropStatus::Planted.as_str())
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Other crops grown in `bed`, most recent first.
    pub async fn bed_history(
        &self,
        bed: &str,
        exclude: CropId,
        limit: i64,
    ) -> Result<Vec<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {CROP_COLUMNS} FROM crops WHERE bed = $1 AND id <> $2 \
             ORDER BY planted_at DESC LIMIT $3"
        );
        let rows = sqlx::query_as::<_, CropRow>(&sql)
            .bind(bed)
            .bind(exclude.into_inner())
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Case-insensitive substring search over name, variety, bed, and
    /// notes.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Crop>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {CROP_COLUMNS} FROM crops \
             WHERE name ILIKE $1 OR variety ILIKE $1 OR bed ILIKE $1 OR notes ILIKE $1 \
             ORDER BY planted_at DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, CropRow>(&sql)
            .bind(like_pattern(query))
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Insert a planted crop.
    pub async fn insert(&self, new: &NewCrop, now: DateTime<Utc>) -> Result<Crop, DbError> {
        let pool = self.db.pool()?;
        let sql = format!(
            "INSERT INTO crops (name, variety, status, planted_at, location, bed, row_label, \
                                image_url, latitude, longitude, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {CROP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CropRow>(&sql)
            .bind(new.name.trim())
            .bind(non_empty(new.variety.as_deref()))
            .bind(CropStatus::Planted.as_str())
            .bind(new.planted_at.unwrap_or(now))
            .bind(non_empty(new.location.as_deref()))
            .bind(non_empty(new.bed.as_deref()))
            .bind(non_empty(new.row.as_deref()))
            .bind(non_empty(new.image_url.as_deref()))
            .bind(new.latitude)
            .bind(new.longitude)
            .bind(non_empty(new.notes.as_deref()))
            .fetch_one(pool)
            .await?;

        tracing::info!(crop_id = row.id, name = %row.name, "Crop added");
        Ok(Crop::try_from(row)?)
    }

    /// Overwrite a crop's editable fields. Returns `None` when absent.
    pub async fn update(&self, id: CropId, update: &CropUpdate) -> Result<Option<Crop>, DbError> {
        let pool = self.db.pool()?;
        let sql = format!(
            "UPDATE crops SET name = $2, variety = $3, location = $4, bed = $5, row_label = $6, \
                    planted_at = COALESCE($7, planted_at), notes = $8, latitude = $9, longitude = $10 \
             WHERE id = $1 \
             RETURNING {CROP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CropRow>(&sql)
            .bind(id.into_inner())
            .bind(update.name.trim())
            .bind(non_empty(update.variety.as_deref()))
            .bind(non_empty(update.location.as_deref()))
            .bind(non_empty(update.bed.as_deref()))
            .bind(non_empty(update.row.as_deref()))
            .bind(update.planted_at)
            .bind(non_empty(update.notes.as_deref()))
            .bind(update.latitude)
            .bind(update.longitude)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Crop::try_from).transpose()?)
    }

    /// Change a crop's state. Harvesting stamps the harvest date.
    pub async fn set_status(
        &self,
        id: CropId,
        status: CropStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let harvested = (status == CropStatus::Harvested).then_some(now);
        let result = sqlx::query(
            "UPDATE crops SET status = $2, harvest_date = COALESCE($3, harvest_date) WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .bind(harvested)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a crop. Its journal entries go with it; tasks are detached.
    pub async fn delete(&self, id: CropId) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("DELETE FROM crops WHERE id = $1")
            .bind(id.into_inner())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `%query%` with `LIKE` metacharacters escaped.
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn collect(rows: Vec<CropRow>) -> Result<Vec<Crop>, DbError> {
    rows.into_iter()
        .map(Crop::try_from)
        .collect::<Result<_, _>>()
        .map_err(DbError::from)
}

/// A row from the `crops` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CropRow {
    /// Primary key.
    pub id: i64,
    /// Common name.
    pub name: String,
    /// Cultivar.
    pub variety: Option<String>,
    /// Lifecycle state as text.
    pub status: String,
    /// Planting timestamp.
    pub planted_at: DateTime<Utc>,
    /// Harvest timestamp.
    pub harvest_date: Option<DateTime<Utc>>,
    /// Location label.
    pub location: Option<String>,
    /// Bed name.
    pub bed: Option<String>,
    /// Row inside the bed.
    pub row_label: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Map latitude.
    pub latitude: Option<f64>,
    /// Map longitude.
    pub longitude: Option<f64>,
    /// Notes.
    pub notes: Option<String>,
}

impl TryFrom<CropRow> for Crop {
    type Error = ParseEnumError;

    fn try_from(row: CropRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CropId(row.id),
            name: row.name,
            variety: row.variety,
            status: row.status.parse()?,
            planted_at: row.planted_at,
            harvest_date: row.harvest_date,
            location: row.location,
            bed: row.bed,
            row: row.row_label,
            image_url: row.image_url,
            latitude: row.latitude,
            longitude: row.longitude,
            notes: row.notes,
        })
    }
}
