//! Test fixtures: a farm with no database, no API keys and an
//! unreachable weather endpoint.

use finquina_ai::{Advisor, AiConfig, FarmProfile};
use finquina_db::Database;
use finquina_integrations::{LocalBlobStore, PlantClient, WeatherClient};
use tempfile::TempDir;

use crate::config::FarmConfig;
use crate::farm::Farm;

/// Nothing listens on the discard port.
pub(crate) const DEAD_WEATHER_URL: &str = "http://127.0.0.1:9/v1";

pub(crate) async fn offline_farm() -> Option<(Farm, TempDir)> {
    let dir = tempfile::tempdir().ok()?;
    let blobs = LocalBlobStore::open(dir.path().join("uploads"), "/uploads")
        .await
        .ok()?;
    let advisor = Advisor::new(&AiConfig::default(), &FarmProfile::default()).ok()?;
    let http = reqwest::Client::new();
    let farm = Farm::new(
        Database::offline("test"),
        advisor,
        WeatherClient::new(http.clone(), DEAD_WEATHER_URL),
        PlantClient::new(http, finquina_integrations::DEFAULT_PERENUAL_URL, None),
        blobs,
        FarmConfig::default(),
    );
    Some((farm, dir))
}
