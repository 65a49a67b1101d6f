//! Core entity records.
//!
//! Each struct mirrors one table. Rows are flat: foreign keys are plain
//! identifiers and joins are assembled by the action layer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CropStatus, ResourceCategory, TaskCategory, TaskPriority, TaskStatus};
use crate::ids::{
    CropId, CropLogId, ExpenseId, MakerModelId, ResourceId, TaskId, TreeId, WeatherLogId,
};

/// A crop planted in a bed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Crop {
    /// Primary key.
    pub id: CropId,
    /// Common name (e.g. `Tomate`). Drives rotation classification.
    pub name: String,
    /// Cultivar, if known.
    pub variety: Option<String>,
    /// Lifecycle state.
    pub status: CropStatus,
    /// When the crop went into the ground.
    pub planted_at: DateTime<Utc>,
    /// Actual harvest date, once harvested.
    pub harvest_date: Option<DateTime<Utc>>,
    /// Free-form location label.
    pub location: Option<String>,
    /// Bed name; crops sharing a bed form its rotation history.
    pub bed: Option<String>,
    /// Row inside the bed; crops sharing bed and row are neighbours.
    pub row: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Map latitude.
    pub latitude: Option<f64>,
    /// Map longitude.
    pub longitude: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl Crop {
    /// Label used when listing this crop as someone's neighbour,
    /// e.g. `Tomate (Corazón de buey)`.
    pub fn neighbour_label(&self) -> String {
        match self.variety.as_deref().filter(|v| !v.is_empty()) {
            Some(variety) => format!("{} ({variety})", self.name),
            None => self.name.clone(),
        }
    }
}

/// A fruit tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tree {
    /// Primary key.
    pub id: TreeId,
    /// Common name.
    pub name: String,
    /// Year the tree was planted.
    pub planted_year: Option<i32>,
    /// Free-form location label.
    pub location: Option<String>,
    /// Map latitude.
    pub latitude: Option<f64>,
    /// Map longitude.
    pub longitude: Option<f64>,
    /// Health label (defaults to `Sano`).
    pub health: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// A unit of farm work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Task {
    /// Primary key.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Completion state.
    pub status: TaskStatus,
    /// Due date, if scheduled.
    pub due_date: Option<DateTime<Utc>>,
    /// Recurrence hint (`weekly`, `monthly`, ...).
    pub periodicity: Option<String>,
    /// Area of the farm.
    pub category: TaskCategory,
    /// Urgency.
    pub priority: TaskPriority,
    /// Crop this task relates to.
    pub crop_id: Option<CropId>,
}

/// A journal entry for a crop, optionally with a photo and AI analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropLog {
    /// Primary key.
    pub id: CropLogId,
    /// The crop this entry belongs to.
    pub crop_id: CropId,
    /// Observation date.
    pub date: DateTime<Utc>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Photo URL.
    pub image_url: Option<String>,
    /// User note.
    pub note: Option<String>,
    /// Formatted AI analysis text.
    pub ai_analysis: Option<String>,
}

/// A journal entry together with the name of its crop, for feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropLogEntry {
    /// The entry.
    #[serde(flatten)]
    pub log: CropLog,
    /// Name of the crop it belongs to.
    pub crop_name: String,
}

/// Money spent on the farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Expense {
    /// Primary key.
    pub id: ExpenseId,
    /// What was bought.
    pub item: String,
    /// Amount in euros.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Spending category.
    pub category: String,
    /// Purchase date.
    pub date: DateTime<Utc>,
    /// Shop name.
    pub shop: Option<String>,
}

/// A stocked inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Resource {
    /// Primary key.
    pub id: ResourceId,
    /// Item name.
    pub name: String,
    /// Kind of item.
    pub category: ResourceCategory,
    /// Units in stock. Never negative.
    #[ts(as = "String")]
    pub quantity: Decimal,
    /// Unit label (`kg`, `sobres`, ...).
    pub unit: String,
    /// Stock level at or below which a low-stock alert fires.
    #[ts(as = "String")]
    pub min_stock: Decimal,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Whether the stock is at or below the alert threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

/// A 3D-printable part kept for farm repairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MakerModel {
    /// Primary key.
    pub id: MakerModelId,
    /// Title.
    pub title: String,
    /// Category label.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// URL of the model file.
    pub file_url: Option<String>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

/// One day of recorded weather at the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherLog {
    /// Primary key.
    pub id: WeatherLogId,
    /// The day (unique).
    pub date: NaiveDate,
    /// Precipitation sum in millimetres.
    pub precipitation: f64,
    /// Maximum relative humidity in percent.
    pub humidity: f64,
    /// Maximum temperature in °C.
    pub temp_max: f64,
    /// Minimum temperature in °C.
    pub temp_min: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_crop(variety: Option<&str>) -> Crop {
        Crop {
            id: CropId(1),
            name: "Tomate".to_owned(),
            variety: variety.map(ToOwned::to_owned),
            status: CropStatus::Planted,
            planted_at: Utc::now(),
            harvest_date: None,
            location: None,
            bed: Some("Bancal 1".to_owned()),
            row: Some("A".to_owned()),
            image_url: None,
            latitude: None,
            longitude: None,
            notes: None,
        }
    }

    #[test]
    fn neighbour_label_includes_variety() {
        assert_eq!(
            sample_crop(Some("Rosa")).neighbour_label(),
            "Tomate (Rosa)"
        );
        assert_eq!(sample_crop(None).neighbour_label(), "Tomate");
        assert_eq!(sample_crop(Some("")).neighbour_label(), "Tomate");
    }

    #[test]
    fn low_stock_is_inclusive() {
        let mut resource = Resource {
            id: ResourceId(1),
            name: "Abono".to_owned(),
            category: ResourceCategory::Fertilizer,
            quantity: Decimal::new(5, 0),
            unit: "kg".to_owned(),
            min_stock: Decimal::new(5, 0),
            updated_at: Utc::now(),
        };
        assert!(resource.is_low_stock());
        resource.quantity = Decimal::new(51, 1);
        assert!(!resource.is_low_stock());
    }
}
