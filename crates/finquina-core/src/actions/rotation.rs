//! Bed rotation.

use finquina_agro::{RotationCategory, next_in_rotation, rotation_type};
use finquina_ai::{RotationAdvice, RotationRequest};
use finquina_types::CropId;
use serde::Serialize;

use crate::farm::{Farm, read_or_default};

/// Previous crops of a bed passed to the advisor.
const BED_HISTORY: i64 = 3;

/// Where a crop sits in the four-year rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationInfo {
    /// The crop name as given.
    pub crop_name: String,
    /// Its group.
    pub category: RotationCategory,
    /// What the group is.
    pub description: &'static str,
    /// The group that should follow.
    pub next: RotationCategory,
    /// What the next group is.
    pub next_description: &'static str,
}

/// Classify a crop name and the group that follows it.
pub fn rotation_info(crop_name: &str) -> RotationInfo {
    let category = rotation_type(crop_name);
    let next = next_in_rotation(category);
    RotationInfo {
        crop_name: crop_name.trim().to_owned(),
        category,
        description: category.description(),
        next,
        next_description: next.description(),
    }
}

impl Farm {
    /// What to plant after a crop in its bed.
    ///
    /// `None` when the crop does not exist or has no bed. When the
    /// advisor fails, the static rotation table answers instead.
    pub async fn rotation_advice(&self, crop_id: CropId) -> Option<RotationAdvice> {
        let crop = read_or_default("rotation_crop", self.db.crops().find(crop_id).await)?;
        let bed = crop.bed.clone().filter(|b| !b.trim().is_empty())?;
        let history = read_or_default(
            "rotation_history",
            self.db.crops().bed_history(&bed, crop_id, BED_HISTORY).await,
        );

        let current = rotation_type(&crop.name);
        let request = RotationRequest {
            bed,
            crop_name: crop.name,
            current,
            history: history.into_iter().map(|c| c.name).collect(),
        };
        match self.advisor.rotation_advice(&request).await {
            Ok(advice) => Some(advice),
            Err(e) => {
                tracing::warn!(crop_id = %crop_id, error = %e, "Rotation advice failed");
                Some(RotationAdvice::fallback(current))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::offline_farm;

    use super::*;

    #[test]
    fn info_follows_the_table() {
        let info = rotation_info(" Tomate ");
        assert_eq!(info.crop_name, "Tomate");
        assert_eq!(info.category, rotation_type("Tomate"));
        assert_eq!(info.next, next_in_rotation(info.category));
        assert_eq!(info.next_description, info.next.description());
    }

    #[tokio::test]
    async fn unknown_crop_has_no_advice() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(farm.rotation_advice(CropId(1)).await.is_none());
    }
}
