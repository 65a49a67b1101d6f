//! Request payloads for creating and updating entities.
//!
//! Payloads are validated with [`validator`] before they reach the
//! database. Optional text fields treat empty strings as absent; use
//! [`non_empty`] when mapping them onto rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::enums::{CropStatus, ResourceCategory, TaskCategory, TaskPriority, TaskStatus};
use crate::ids::CropId;

/// Collapse an empty or whitespace-only string to `None`.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// Trim whitespace and one pair of matching surrounding quotes.
///
/// Secrets pasted into `.env` files or hosting dashboards often arrive
/// as `"value"` or `'value'`.
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .map_or(trimmed, str::trim)
}

/// Payload for planting a new crop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewCrop {
    /// Common name (required).
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub name: String,
    /// Cultivar.
    #[serde(default)]
    pub variety: Option<String>,
    /// Location label.
    #[serde(default)]
    pub location: Option<String>,
    /// Bed name.
    #[serde(default)]
    pub bed: Option<String>,
    /// Row inside the bed.
    #[serde(default)]
    pub row: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Map latitude.
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Map longitude.
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Planting date; defaults to now.
    #[serde(default)]
    pub planted_at: Option<DateTime<Utc>>,
}

/// Payload for editing an existing crop.
///
/// Every field is written; `planted_at: None` keeps the stored date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropUpdate {
    /// Common name (required).
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub name: String,
    /// Cultivar.
    #[serde(default)]
    pub variety: Option<String>,
    /// Location label.
    #[serde(default)]
    pub location: Option<String>,
    /// Bed name.
    #[serde(default)]
    pub bed: Option<String>,
    /// Row inside the bed.
    #[serde(default)]
    pub row: Option<String>,
    /// New planting date, or `None` to keep the current one.
    #[serde(default)]
    pub planted_at: Option<DateTime<Utc>>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Map latitude.
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Map longitude.
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Payload for changing a crop's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropStatusUpdate {
    /// The new state.
    pub status: CropStatus,
}

/// Payload for registering a fruit tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewTree {
    /// Common name (required).
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub name: String,
    /// Year planted.
    #[serde(default)]
    pub planted_year: Option<i32>,
    /// Location label.
    #[serde(default)]
    pub location: Option<String>,
    /// Map latitude.
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Map longitude.
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Health label; defaults to `Sano`.
    #[serde(default)]
    pub health: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewTask {
    /// Short title (required).
    #[validate(length(min = 1, message = "El título es requerido"))]
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Area of the farm; defaults to `Garden`.
    #[serde(default)]
    pub category: TaskCategory,
    /// Urgency; defaults to `Normal`.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Recurrence hint.
    #[serde(default)]
    pub periodicity: Option<String>,
    /// Related crop.
    #[serde(default)]
    pub crop_id: Option<CropId>,
}

/// Payload for marking a task pending or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TaskStatusUpdate {
    /// The new state.
    pub status: TaskStatus,
}

/// Payload for logging an expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewExpense {
    /// What was bought (required).
    #[validate(length(min = 1, message = "Item y cantidad son requeridos"))]
    pub item: String,
    /// Amount in euros (required).
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Category; defaults to `Otros`.
    #[serde(default)]
    pub category: Option<String>,
    /// Purchase date; defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Shop name.
    #[serde(default)]
    pub shop: Option<String>,
}

/// Payload for adding an inventory resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewResource {
    /// Item name (required).
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub name: String,
    /// Kind of item.
    pub category: ResourceCategory,
    /// Initial stock. Negative values are stored as zero.
    #[ts(as = "String")]
    pub quantity: Decimal,
    /// Unit label.
    #[validate(length(min = 1))]
    pub unit: String,
    /// Low-stock threshold.
    #[serde(default)]
    #[ts(as = "String")]
    pub min_stock: Decimal,
    /// Purchase cost; when positive an expense is logged.
    #[serde(default)]
    #[ts(as = "String")]
    pub cost: Decimal,
}

/// Payload for adjusting stock by a signed delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuantityAdjustment {
    /// Signed change in stock.
    #[ts(as = "String")]
    pub delta: Decimal,
    /// Restock cost; only used when `delta` is positive.
    #[serde(default)]
    #[ts(as = "String")]
    pub cost: Decimal,
}

/// Payload for registering a maker model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewMakerModel {
    /// Title (required).
    #[validate(length(min = 1))]
    pub title: String,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// URL of the model file.
    #[serde(default)]
    pub file_url: Option<String>,
}

/// A journal entry to be stored for a crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewCropLog {
    /// The crop; must exist.
    pub crop_id: CropId,
    /// Photo URL.
    pub image_url: Option<String>,
    /// User note.
    pub note: Option<String>,
    /// Formatted AI analysis.
    pub ai_analysis: Option<String>,
    /// Observation date.
    pub date: DateTime<Utc>,
}

/// One day of weather readings to upsert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherReading {
    /// The day.
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
