//! Crop inventory actions.

use chrono::Utc;
use finquina_types::{Crop, CropId, CropLog, CropStatus, CropUpdate, NewCrop};
use serde::Serialize;

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, validate, written};
use crate::revalidate::{CALENDAR, CROPS, HOME, MAP, crop_path};

/// A crop with its journal, newest entry first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropDetail {
    /// The crop.
    #[serde(flatten)]
    pub crop: Crop,
    /// Its journal entries.
    pub logs: Vec<CropLog>,
}

impl Farm {
    /// All crops, most recently planted first.
    pub async fn list_crops(&self) -> Vec<Crop> {
        read_or_default("list_crops", self.db.crops().list().await)
    }

    /// One crop with its journal.
    pub async fn get_crop(&self, id: CropId) -> Option<CropDetail> {
        let crop = read_or_default("get_crop", self.db.crops().find(id).await)?;
        let logs = read_or_default("get_crop_logs", self.db.crop_logs().for_crop(id).await);
        Some(CropDetail { crop, logs })
    }

    /// Plant a new crop.
    pub async fn add_crop(&self, new: &NewCrop) -> Result<Option<Crop>, ActionError> {
        validate(new)?;
        let crop = written("add_crop", self.db.crops().insert(new, Utc::now()).await);
        if crop.is_some() {
            self.revalidate(&[CROPS, MAP, HOME]);
        }
        Ok(crop)
    }

    /// Edit a crop. `None` when it does not exist or nothing was stored.
    pub async fn update_crop(
        &self,
        id: CropId,
        update: &CropUpdate,
    ) -> Result<Option<Crop>, ActionError> {
        validate(update)?;
        let crop = written("update_crop", self.db.crops().update(id, update).await).flatten();
        if crop.is_some() {
            self.revalidate(&[crop_path(id), CROPS.to_owned()]);
        }
        Ok(crop)
    }

    /// Change a crop's lifecycle state.
    pub async fn update_crop_status(&self, id: CropId, status: CropStatus) -> bool {
        let changed = written(
            "update_crop_status",
            self.db.crops().set_status(id, status, Utc::now()).await,
        )
        .unwrap_or(false);
        if changed {
            tracing::info!(crop_id = %id, status = %status, "Crop status changed");
            self.revalidate(&[CROPS, HOME, CALENDAR]);
        }
        changed
    }

    /// Delete a crop and, through the cascade, its journal.
    pub async fn delete_crop(&self, id: CropId) -> bool {
        let deleted = written("delete_crop", self.db.crops().delete(id).await).unwrap_or(false);
        if deleted {
            tracing::info!(crop_id = %id, "Crop deleted");
            self.revalidate(&[CROPS, MAP, HOME]);
        }
        deleted
    }
}
