//! Irrigation advice from recent rainfall.

use serde::{Deserialize, Serialize};

/// How many of the most recent daily logs count towards the rain sum.
pub const RAIN_WINDOW_DAYS: usize = 3;

/// Rain thresholds (in millimetres over [`RAIN_WINDOW_DAYS`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationThresholds {
    /// Above this the vegetable beds are considered wet.
    pub crops_wet_mm: f64,
    /// Above this the trees need no attention.
    pub trees_ok_mm: f64,
}

impl Default for IrrigationThresholds {
    fn default() -> Self {
        Self {
            crops_wet_mm: 5.0,
            trees_ok_mm: 3.0,
        }
    }
}

/// Watering verdict for one group of plants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WateringStatus {
    /// Vegetable beds got enough rain.
    SoilWet,
    /// Vegetable beds need watering.
    NeedsWatering,
    /// Trees are fine.
    Ok,
    /// Trees should be checked.
    CheckWatering,
}

impl WateringStatus {
    /// Short upper-case label shown on the dashboard.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoilWet => "SUELO HÚMEDO",
            Self::NeedsWatering => "REQUIERE RIEGO",
            Self::Ok => "ESTADO OK",
            Self::CheckWatering => "REVISAR RIEGO",
        }
    }

    /// Whether this verdict asks for action.
    pub const fn needs_action(self) -> bool {
        matches!(self, Self::NeedsWatering | Self::CheckWatering)
    }
}

/// Watering advice for crops and trees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrrigationAdvice {
    /// Rain over the window, in millimetres.
    pub recent_rain_mm: f64,
    /// Verdict for the vegetable beds.
    pub crops: WateringStatus,
    /// Verdict for the fruit trees.
    pub trees: WateringStatus,
}

/// Sum the precipitation of the newest [`RAIN_WINDOW_DAYS`] entries.
///
/// `precipitation` must be ordered newest first.
pub fn recent_rain(precipitation: &[f64]) -> f64 {
    precipitation.iter().take(RAIN_WINDOW_DAYS).sum()
}

/// Advise on watering given daily precipitation, newest first.
pub fn irrigation_advice(
    precipitation: &[f64],
    thresholds: &IrrigationThresholds,
) -> IrrigationAdvice {
    let rain = recent_rain(precipitation);
    let crops = if rain > thresholds.crops_wet_mm {
        WateringStatus::SoilWet
    } else {
        WateringStatus::NeedsWatering
    };
    let trees = if rain > thresholds.trees_ok_mm {
        WateringStatus::Ok
    } else {
        WateringStatus::CheckWatering
    };
    IrrigationAdvice {
        recent_rain_mm: rain,
        crops,
        trees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_newest_days_count() {
        assert!((recent_rain(&[1.0, 2.0, 3.0, 100.0]) - 6.0).abs() < f64::EPSILON);
        assert!(recent_rain(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn wet_week_needs_no_watering() {
        let advice = irrigation_advice(&[4.0, 2.0, 0.5], &IrrigationThresholds::default());
        assert_eq!(advice.crops, WateringStatus::SoilWet);
        assert_eq!(advice.trees, WateringStatus::Ok);
        assert!(!advice.crops.needs_action());
    }

    #[test]
    fn thresholds_are_strict() {
        let thresholds = IrrigationThresholds::default();
        let advice = irrigation_advice(&[5.0], &thresholds);
        assert_eq!(advice.crops, WateringStatus::NeedsWatering);
        assert_eq!(advice.trees, WateringStatus::Ok);

        let advice = irrigation_advice(&[3.0], &thresholds);
        assert_eq!(advice.trees, WateringStatus::CheckWatering);
        assert_eq!(advice.trees.label(), "REVISAR RIEGO");
    }

    #[test]
    fn no_logs_means_water_everything() {
        let advice = irrigation_advice(&[], &IrrigationThresholds::default());
        assert!(advice.crops.needs_action());
        assert!(advice.trees.needs_action());
    }
}
