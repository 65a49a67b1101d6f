//! Agronomic knowledge for La Finquina.
//!
//! Pure lookup tables and formulas with no I/O. Everything here takes
//! plain values (names, dates, readings) and returns plain values, so
//! the action layer can call it with data from the database or from an
//! external API alike.
//!
//! # Modules
//!
//! - [`rotation`] -- Four-year crop rotation groups and succession.
//! - [`companion`] -- Companion-planting catalogue and pair compatibility.
//! - [`lunar`] -- Lunar phase, illumination, and biodynamic day type.
//! - [`irrigation`] -- Watering verdicts from recent rainfall.
//! - [`weather_code`] -- WMO weather-code themes and forecast alerts.
//! - [`harvest`] -- Harvest month extraction from journal analyses.
//! - [`health`] -- Farm health score and agronomic tip parsing.
//! - [`analytics`] -- Expense totals by category and month.

pub mod analytics;
pub mod companion;
pub mod harvest;
pub mod health;
pub mod irrigation;
pub mod lunar;
pub mod rotation;
pub mod weather_code;

// Re-export primary types at crate root.
pub use analytics::{ExpenseAnalytics, expense_analytics, monthly_spending, start_of_month};
pub use companion::{
    Compatibility, CompatibilityType, PlantInfo, PlantKind, compatibility, find_plant,
    fruit_trees, vegetables,
};
pub use harvest::{HarvestPrediction, predict_harvest};
pub use health::{
    AgronomicAlert, HealthInputs, agronomic_alerts, agronomic_tips, farm_health_score, first_tip,
};
pub use irrigation::{IrrigationAdvice, IrrigationThresholds, WateringStatus, irrigation_advice};
pub use lunar::{DayType, LunarInfo, LunarPhase, lunar_info};
pub use rotation::{RotationCategory, next_in_rotation, rotation_type};
pub use weather_code::{AlertKind, WeatherAlert, WeatherTheme, forecast_alerts, weather_theme};
