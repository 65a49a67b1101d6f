//! Daily weather history.
//!
//! One row per calendar day; syncing the same day twice overwrites it.

use chrono::NaiveDate;
use finquina_types::{WeatherLog, WeatherLogId, WeatherReading};

use crate::database::Database;
use crate::error::DbError;

/// Operations on the `weather_logs` table.
pub struct WeatherStore<'a> {
    db: &'a Database,
}

impl<'a> WeatherStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The newest `limit` days, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<WeatherLog>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, WeatherLogRow>(
            r"SELECT id, date, precipitation, humidity, temp_max, temp_min
              FROM weather_logs
              ORDER BY date DESC
              LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(WeatherLog::from).collect())
    }

    /// Insert or overwrite the readings for each day.
    ///
    /// Returns the number of days written.
    pub async fn upsert_many(&self, readings: &[WeatherReading]) -> Result<u64, DbError> {
        let pool = self.db.pool()?;
        let mut written: u64 = 0;
        for reading in readings {
            let result = sqlx::query(
                r"INSERT INTO weather_logs (date, precipitation, humidity, temp_max, temp_min)
                  VALUES ($1, $2, $3, $4, $5)
                  ON CONFLICT (date) DO UPDATE SET
                      precipitation = EXCLUDED.precipitation,
                      humidity = EXCLUDED.humidity,
                      temp_max = EXCLUDED.temp_max,
                      temp_min = EXCLUDED.temp_min",
            )
            .bind(reading.date)
            .bind(reading.precipitation)
            .bind(reading.humidity)
            .bind(reading.temp_max)
            .bind(reading.temp_min)
            .execute(pool)
            .await?;
            written = written.saturating_add(result.rows_affected());
        }

        tracing::debug!(days = written, "Weather history upserted");
        Ok(written)
    }
}

/// A row from the `weather_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeatherLogRow {
    /// Primary key.
    pub id: i64,
    /// The day.
    pub date: NaiveDate,
    /// Precipitation in millimetres.
    pub precipitation: f64,
    /// Maximum humidity.
    pub humidity: f64,
    /// Maximum temperature.
    pub temp_max: f64,
    /// Minimum temperature.
    pub temp_min: f64,
}

impl From<WeatherLogRow> for WeatherLog {
    fn from(row: WeatherLogRow) -> Self {
        Self {
            id: WeatherLogId(row.id),
            date: row.date,
            precipitation: row.precipitation,
            humidity: row.humidity,
            temp_max: row.temp_max,
            temp_min: row.temp_min,
        }
    }
}
