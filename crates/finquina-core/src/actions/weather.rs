//! Weather actions: live conditions, daily history, irrigation.

use finquina_agro::{IrrigationAdvice, irrigation_advice};
use finquina_integrations::CurrentWeather;
use finquina_types::WeatherLog;

use crate::farm::{Farm, read_or_default, written};
use crate::revalidate::HOME;

/// Days of stored history shown with the rainfall chart.
pub const RAINFALL_DAYS: i64 = 7;

/// Newest-first precipitation column of a weather history.
pub fn precipitation(logs: &[WeatherLog]) -> Vec<f64> {
    logs.iter().map(|l| l.precipitation).collect()
}

impl Farm {
    /// Live conditions at the farm, `None` when the provider fails.
    pub async fn current_weather(&self) -> Option<CurrentWeather> {
        match self.weather.current(self.config.coordinates()).await {
            Ok(weather) => Some(weather),
            Err(e) => {
                tracing::warn!(error = %e, "Weather fetch failed");
                None
            }
        }
    }

    /// Store the past week and today, one row per day.
    ///
    /// Returns how many days were written.
    pub async fn sync_weather_history(&self) -> u64 {
        let readings = match self.weather.history(self.config.coordinates()).await {
            Ok(readings) => readings,
            Err(e) => {
                tracing::warn!(error = %e, "Weather history fetch failed");
                return 0;
            }
        };
        let count = written(
            "sync_weather_history",
            self.db.weather().upsert_many(&readings).await,
        )
        .unwrap_or(0);
        if count > 0 {
            tracing::info!(days = count, "Weather history synced");
            self.revalidate(&[HOME]);
        }
        count
    }

    /// Store today's daily summary.
    pub async fn record_today_weather(&self) -> bool {
        let today = match self.weather.today(self.config.coordinates()).await {
            Ok(Some(reading)) => reading,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Today's weather fetch failed");
                return false;
            }
        };
        written(
            "record_today_weather",
            self.db.weather().upsert_many(&[today]).await,
        )
        .is_some_and(|n| n > 0)
    }

    /// The last week of stored days, newest first.
    pub async fn recent_rainfall(&self) -> Vec<WeatherLog> {
        read_or_default(
            "recent_rainfall",
            self.db.weather().recent(RAINFALL_DAYS).await,
        )
    }

    /// Watering advice from the stored rainfall.
    pub async fn irrigation_advice(&self) -> IrrigationAdvice {
        let logs = self.recent_rainfall().await;
        irrigation_advice(&precipitation(&logs), &self.config.irrigation)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use finquina_agro::WateringStatus;
    use finquina_types::WeatherLogId;

    use crate::testing::offline_farm;

    use super::*;

    fn log(day: u32, rain: f64) -> WeatherLog {
        WeatherLog {
            id: WeatherLogId(i64::from(day)),
            date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap_or_default(),
            precipitation: rain,
            humidity: 80.0,
            temp_max: 20.0,
            temp_min: 11.0,
        }
    }

    #[test]
    fn precipitation_keeps_order() {
        assert_eq!(precipitation(&[log(3, 1.5), log(2, 0.0), log(1, 4.0)]), vec![1.5, 0.0, 4.0]);
    }

    #[tokio::test]
    async fn unreachable_provider_degrades() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(farm.current_weather().await.is_none());
        assert_eq!(farm.sync_weather_history().await, 0);
        assert!(!farm.record_today_weather().await);
        assert!(farm.recent_rainfall().await.is_empty());
    }

    #[tokio::test]
    async fn no_history_means_water() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let advice = farm.irrigation_advice().await;
        assert_eq!(advice.crops, WateringStatus::NeedsWatering);
        assert_eq!(advice.trees, WateringStatus::CheckWatering);
    }
}
