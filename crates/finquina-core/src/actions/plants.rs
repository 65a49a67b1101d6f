//! Plant species lookup through the Perenual catalogue.
//!
//! The catalogue is English-only, so queries go through the advisor's
//! translator on the way in and the top names on the way out.

use finquina_integrations::{PlantDetails, PlantSummary};
use futures::future::join_all;

use crate::actions::search::MIN_QUERY_CHARS;
use crate::farm::Farm;

/// Results translated back and returned.
pub const PLANT_RESULTS: usize = 8;

impl Farm {
    /// Search species by a Spanish or English name.
    ///
    /// Provider failures yield an empty list.
    pub async fn search_plant_species(&self, query: &str) -> Vec<PlantSummary> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let english = self.advisor.translate_to_english(query).await;
        let mut results = match self.plants.search(&english).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query = %english, error = %e, "Plant search failed");
                return Vec::new();
            }
        };
        if results.is_empty() && english != query {
            results = match self.plants.search(query).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(query, error = %e, "Plant search retry failed");
                    return Vec::new();
                }
            };
        }

        results.truncate(PLANT_RESULTS);
        let names = join_all(
            results
                .iter()
                .map(|p| self.advisor.translate_to_spanish(&p.common_name)),
        )
        .await;
        for (plant, name) in results.iter_mut().zip(names) {
            if !name.trim().is_empty() {
                plant.common_name = name;
            }
        }
        results
    }

    /// Full catalogue record for one species.
    pub async fn plant_details(&self, id: i64) -> Option<PlantDetails> {
        match self.plants.details(id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(plant_id = id, error = %e, "Plant details failed");
                None
            }
        }
    }
}
