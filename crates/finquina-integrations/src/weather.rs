//! Open-Meteo forecast client.
//!
//! Two calls are made against the same `/forecast` endpoint: a current
//! conditions snapshot with a three-day outlook (for alerts), and a daily
//! series covering the past week plus today (for the rainfall history).

use chrono::NaiveDate;
use finquina_agro::{WeatherAlert, forecast_alerts};
use finquina_types::WeatherReading;
use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, read_json};

/// Base URL of the Open-Meteo API.
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1";

const SERVICE: &str = "Open-Meteo";

const HISTORY_DAILY: &str =
    "precipitation_sum,relative_humidity_2m_max,temperature_2m_max,temperature_2m_min";

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            latitude: 43.435_19,
            longitude: -5.684_78,
        }
    }
}

/// Current conditions plus alerts from the short-range forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    /// Air temperature in °C.
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// WMO weather code.
    pub code: i32,
    /// Local observation time as reported.
    pub time: String,
    /// Frost and heavy-rain alerts for the next days.
    pub alerts: Vec<WeatherAlert>,
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    #[serde(default)]
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
}

/// Daily series. Open-Meteo reports missing values as `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    precipitation_sum: Vec<Option<f64>>,
    relative_humidity_2m_max: Vec<Option<f64>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

fn value_at(series: &[Option<f64>], index: usize) -> f64 {
    series.get(index).copied().flatten().unwrap_or_default()
}

fn present(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().filter_map(|v| *v).collect()
}

/// Parse a current-conditions response.
pub fn parse_current(json: serde_json::Value) -> Result<CurrentWeather, IntegrationError> {
    let response: ForecastResponse =
        serde_json::from_value(json).map_err(|e| IntegrationError::Response {
            service: SERVICE,
            message: e.to_string(),
        })?;
    let current = response.current.ok_or_else(|| IntegrationError::Response {
        service: SERVICE,
        message: "missing current block".to_owned(),
    })?;
    let daily = response.daily.unwrap_or_default();

    Ok(CurrentWeather {
        temperature: current.temperature_2m,
        humidity: current.relative_humidity_2m,
        code: current.weather_code,
        time: current.time,
        alerts: forecast_alerts(
            &present(&daily.temperature_2m_min),
            &present(&daily.precipitation_sum),
        ),
    })
}

/// Parse a daily series into one reading per day.
pub fn parse_daily(json: serde_json::Value) -> Result<Vec<WeatherReading>, IntegrationError> {
    let response: ForecastResponse =
        serde_json::from_value(json).map_err(|e| IntegrationError::Response {
            service: SERVICE,
            message: e.to_string(),
        })?;
    let Some(daily) = response.daily else {
        return Ok(Vec::new());
    };

    Ok(daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| WeatherReading {
            date: *date,
            precipitation: value_at(&daily.precipitation_sum, i),
            humidity: value_at(&daily.relative_humidity_2m_max, i),
            temp_max: value_at(&daily.temperature_2m_max, i),
            temp_min: value_at(&daily.temperature_2m_min, i),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a client against `base_url`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create a client using `WEATHER_API_URL` or the public endpoint.
    pub fn from_lookup<F>(client: reqwest::Client, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("WEATHER_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_owned());
        Self::new(client, url.trim())
    }

    async fn forecast(
        &self,
        at: Coordinates,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, IntegrationError> {
        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("timezone", "auto".to_owned()),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| IntegrationError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;
        read_json(SERVICE, response).await
    }

    /// Current conditions with frost and rain alerts for three days.
    pub async fn current(&self, at: Coordinates) -> Result<CurrentWeather, IntegrationError> {
        let json = self
            .forecast(
                at,
                &[
                    ("current", "temperature_2m,relative_humidity_2m,weather_code"),
                    ("daily", "temperature_2m_min,precipitation_sum"),
                    ("forecast_days", "3"),
                ],
            )
            .await?;
        parse_current(json)
    }

    /// Today's daily summary.
    pub async fn today(&self, at: Coordinates) -> Result<Option<WeatherReading>, IntegrationError> {
        let json = self
            .forecast(at, &[("daily", HISTORY_DAILY), ("forecast_days", "1")])
            .await?;
        Ok(parse_daily(json)?.into_iter().next())
    }

    /// The past seven days plus today.
    pub async fn history(&self, at: Coordinates) -> Result<Vec<WeatherReading>, IntegrationError> {
        let json = self
            .forecast(
                at,
                &[
                    ("daily", HISTORY_DAILY),
                    ("past_days", "7"),
                    ("forecast_days", "1"),
                ],
            )
            .await?;
        parse_daily(json)
    }
}
