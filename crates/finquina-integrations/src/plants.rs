//! Perenual plant catalogue client.
//!
//! Search and detail lookups against the Perenual v2 API. The API is
//! optional: without `PERENUAL_API_KEY` every call returns an empty
//! result instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{IntegrationError, read_json};

/// Base URL of the Perenual API.
pub const DEFAULT_PERENUAL_URL: &str = "https://perenual.com/api/v2";

const SERVICE: &str = "Perenual";

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Image URLs for a species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantImage {
    /// Full-size image.
    #[serde(default)]
    pub original_url: Option<String>,
    /// Thumbnail.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A species as returned by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSummary {
    /// Perenual species id.
    pub id: i64,
    /// Common name.
    #[serde(default, deserialize_with = "nullable")]
    pub common_name: String,
    /// Scientific names.
    #[serde(default, deserialize_with = "nullable")]
    pub scientific_name: Vec<String>,
    /// Other common names.
    #[serde(default, deserialize_with = "nullable")]
    pub other_name: Vec<String>,
    /// Life cycle (`Perennial`, `Annual`, ...).
    #[serde(default)]
    pub cycle: Option<String>,
    /// Watering needs.
    #[serde(default)]
    pub watering: Option<String>,
    /// Sunlight needs.
    #[serde(default, deserialize_with = "nullable")]
    pub sunlight: Vec<String>,
    /// Images, when available.
    #[serde(default)]
    pub default_image: Option<PlantImage>,
}

/// Minimum and maximum hardiness zones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardiness {
    /// Coldest zone.
    #[serde(default)]
    pub min: Option<String>,
    /// Warmest zone.
    #[serde(default)]
    pub max: Option<String>,
}

/// Full species record from the details endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantDetails {
    /// Fields shared with search results.
    #[serde(flatten)]
    pub summary: PlantSummary,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Plant type (`tree`, `herb`, ...).
    #[serde(default, rename = "type")]
    pub plant_type: Option<String>,
    /// Typical size.
    #[serde(default)]
    pub dimension: Option<String>,
    /// Care difficulty.
    #[serde(default)]
    pub care_level: Option<String>,
    /// Wildlife it attracts.
    #[serde(default, deserialize_with = "nullable")]
    pub attracts: Vec<String>,
    /// Propagation methods.
    #[serde(default, deserialize_with = "nullable")]
    pub propagation: Vec<String>,
    /// Hardiness zones.
    #[serde(default)]
    pub hardiness: Option<Hardiness>,
    /// Whether it flowers.
    #[serde(default)]
    pub flowers: Option<bool>,
    /// Flowering season.
    #[serde(default)]
    pub flowering_season: Option<String>,
    /// Fruiting season.
    #[serde(default)]
    pub fruiting_season: Option<String>,
    /// Whether it has leaves.
    #[serde(default)]
    pub leaf: Option<bool>,
    /// Leaf colours.
    #[serde(default, deserialize_with = "nullable")]
    pub leaf_color: Vec<String>,
    /// Whether the fruit is edible.
    #[serde(default)]
    pub edible_fruit: Option<bool>,
    /// Maintenance level.
    #[serde(default)]
    pub maintenance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default, deserialize_with = "nullable")]
    data: Vec<PlantSummary>,
}

/// HTTP client for the Perenual API.
#[derive(Clone)]
pub struct PlantClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl core::fmt::Debug for PlantClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlantClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl PlantClient {
    /// Create a client. A blank key disables the client.
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key
                .map(finquina_types::unquote)
                .filter(|k| !k.is_empty())
                .map(ToOwned::to_owned),
        }
    }

    /// Create a client from `PERENUAL_API_KEY` and `PERENUAL_API_URL`.
    pub fn from_lookup<F>(client: reqwest::Client, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PERENUAL_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PERENUAL_URL.to_owned());
        let api_key = lookup("PERENUAL_API_KEY");
        let plants = Self::new(client, base_url.trim(), api_key.as_deref());
        if !plants.is_configured() {
            tracing::warn!("PERENUAL_API_KEY is missing; plant search disabled");
        }
        plants
    }

    /// Whether an API key is configured.
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search species by common name.
    pub async fn search(&self, query: &str) -> Result<Vec<PlantSummary>, IntegrationError> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let response = self
            .client
            .get(format!("{}/species-list", self.base_url))
            .query(&[("key", key), ("q", query)])
            .send()
            .await
            .map_err(|e| IntegrationError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;
        let body: SearchResponse = read_json(SERVICE, response).await?;
        tracing::debug!(query, results = body.data.len(), "Plant search");
        Ok(body.data)
    }

    /// Full record for one species. `None` when the client is disabled.
    pub async fn details(&self, id: i64) -> Result<Option<PlantDetails>, IntegrationError> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(None);
        };
        let response = self
            .client
            .get(format!("{}/species/details/{id}", self.base_url))
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| IntegrationError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;
        read_json(SERVICE, response).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_tolerates_nulls() {
        let json = r#"{
            "data": [
                {"id": 1, "common_name": "tomato", "scientific_name": ["Solanum lycopersicum"],
                 "other_name": null, "cycle": "Annual", "watering": "Frequent",
                 "sunlight": ["full sun"], "default_image": null},
                {"id": 2, "common_name": null}
            ],
            "total": 2
        }"#;
        let parsed: Result<SearchResponse, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        let data = parsed.map(|r| r.data).unwrap_or_default();
        assert_eq!(data.len(), 2);
        assert_eq!(data.first().map(|p| p.common_name.as_str()), Some("tomato"));
        assert!(data.first().is_some_and(|p| p.other_name.is_empty()));
        assert!(data.get(1).is_some_and(|p| p.common_name.is_empty()));
    }

    #[test]
    fn details_flatten_summary() {
        let json = r#"{
            "id": 728, "common_name": "apple", "type": "tree",
            "hardiness": {"min": "4", "max": "8"}, "edible_fruit": true,
            "propagation": ["Grafting"], "attracts": null
        }"#;
        let parsed: Result<PlantDetails, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        let details = parsed.unwrap_or_default();
        assert_eq!(details.summary.id, 728);
        assert_eq!(details.plant_type.as_deref(), Some("tree"));
        assert_eq!(details.edible_fruit, Some(true));
        assert!(details.attracts.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_client_returns_empty() {
        let plants = PlantClient::new(reqwest::Client::new(), DEFAULT_PERENUAL_URL, Some("  "));
        assert!(!plants.is_configured());
        assert!(plants.search("tomato").await.is_ok_and(|r| r.is_empty()));
        assert!(plants.details(1).await.is_ok_and(|d| d.is_none()));
    }
}
