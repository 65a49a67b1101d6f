//! Lunar phase and biodynamic day type.
//!
//! A simplified model: the phase is the time elapsed since a known new
//! moon, modulo the mean synodic month. Good to within about a day, which
//! is all the planting calendar needs.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588;

/// Milliseconds per day.
const MS_PER_DAY: f64 = 86_400_000.0;

/// Width (in days) of the new and full moon windows on each side.
const PHASE_WINDOW_DAYS: f64 = 1.5;

/// The reference new moon: 2000-01-06 18:14 UTC.
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Named phase bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LunarPhase {
    /// New moon.
    #[serde(rename = "Nueva")]
    New,
    /// Waxing moon.
    #[serde(rename = "Creciente")]
    Waxing,
    /// Full moon.
    #[serde(rename = "Llena")]
    Full,
    /// Waning moon.
    #[serde(rename = "Menguante")]
    Waning,
}

/// Biodynamic day type: which part of the plant the day favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayType {
    /// Root crops.
    #[serde(rename = "Raíz")]
    Root,
    /// Leaf crops.
    #[serde(rename = "Hoja")]
    Leaf,
    /// Flowering crops.
    #[serde(rename = "Flor")]
    Flower,
    /// Fruiting crops.
    #[serde(rename = "Fruto")]
    Fruit,
    /// Avoid sowing.
    #[serde(rename = "Descanso")]
    Rest,
}

/// Phase information for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarInfo {
    /// Named phase.
    pub phase: LunarPhase,
    /// Illuminated fraction in percent, `0..=100`.
    pub illumination: u8,
    /// Planting advice for the phase.
    pub recommendation: &'static str,
    /// Biodynamic day type.
    pub day_type: DayType,
    /// Days since the last new moon, in `[0, SYNODIC_MONTH_DAYS)`.
    pub age_days: f64,
}

/// Days since the most recent new moon at `date`.
///
/// Dates before the reference wrap correctly.
#[allow(clippy::cast_precision_loss)]
pub fn moon_age_days(date: DateTime<Utc>) -> f64 {
    let elapsed_ms = date
        .signed_duration_since(reference_new_moon())
        .num_milliseconds();
    let elapsed_days = elapsed_ms as f64 / MS_PER_DAY;
    elapsed_days.rem_euclid(SYNODIC_MONTH_DAYS)
}

/// Illuminated fraction in percent for a moon age.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn illumination_percent(age_days: f64) -> u8 {
    let fraction = 1.0 - (2.0 * (age_days / SYNODIC_MONTH_DAYS) - 1.0).abs();
    (100.0 * fraction).round().clamp(0.0, 100.0) as u8
}

/// Compute the lunar phase and planting advice for `date`.
#[allow(clippy::cast_possible_truncation)]
pub fn lunar_info(date: DateTime<Utc>) -> LunarInfo {
    let age = moon_age_days(date);
    let half = SYNODIC_MONTH_DAYS / 2.0;

    let (phase, day_type, recommendation) = if age < PHASE_WINDOW_DAYS
        || age > SYNODIC_MONTH_DAYS - PHASE_WINDOW_DAYS
    {
        (
            LunarPhase::New,
            DayType::Rest,
            "Evitar siembra. Buen momento para control de plagas y limpieza.",
        )
    } else if age < half - PHASE_WINDOW_DAYS {
        // Alternate leaf and flower days through the waxing phase.
        let day_type = if (age.rem_euclid(4.0)).floor() as i64 == 0 {
            DayType::Leaf
        } else {
            DayType::Flower
        };
        (
            LunarPhase::Waxing,
            day_type,
            "Ideal para sembrar plantas de superficie (hojas y flores). El vigor sube.",
        )
    } else if age < half + PHASE_WINDOW_DAYS {
        (
            LunarPhase::Full,
            DayType::Fruit,
            "Momento de máxima savia. Ideal para cosechar frutos y trasplantar.",
        )
    } else {
        (
            LunarPhase::Waning,
            DayType::Root,
            "Energía hacia las raíces. Ideal para siembra de tubérculos y poda.",
        )
    };

    LunarInfo {
        phase,
        illumination: illumination_percent(age),
        recommendation,
        day_type,
        age_days: age,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[allow(clippy::cast_possible_truncation)]
    fn days(d: f64) -> Duration {
        Duration::milliseconds((d * MS_PER_DAY) as i64)
    }

    #[test]
    fn reference_instant_is_new_moon() {
        let info = lunar_info(reference_new_moon());
        assert_eq!(info.phase, LunarPhase::New);
        assert_eq!(info.day_type, DayType::Rest);
        assert_eq!(info.illumination, 0);
    }

    #[test]
    fn half_cycle_is_full_moon() {
        let info = lunar_info(reference_new_moon() + days(SYNODIC_MONTH_DAYS / 2.0));
        assert_eq!(info.phase, LunarPhase::Full);
        assert_eq!(info.day_type, DayType::Fruit);
        assert_eq!(info.illumination, 100);
    }

    #[test]
    fn waxing_alternates_leaf_and_flower() {
        let leaf = lunar_info(reference_new_moon() + days(4.5));
        assert_eq!(leaf.phase, LunarPhase::Waxing);
        assert_eq!(leaf.day_type, DayType::Leaf);

        let flower = lunar_info(reference_new_moon() + days(5.5));
        assert_eq!(flower.phase, LunarPhase::Waxing);
        assert_eq!(flower.day_type, DayType::Flower);
    }

    #[test]
    fn waning_favours_roots() {
        let info = lunar_info(reference_new_moon() + days(22.0));
        assert_eq!(info.phase, LunarPhase::Waning);
        assert_eq!(info.day_type, DayType::Root);
    }

    #[test]
    fn dates_before_reference_wrap_into_range() {
        let info = lunar_info(reference_new_moon() - days(3.0));
        assert!(info.age_days >= 0.0);
        assert!(info.age_days < SYNODIC_MONTH_DAYS);
        assert_eq!(info.phase, LunarPhase::Waning);

        let ancient = Utc.with_ymd_and_hms(1850, 3, 1, 0, 0, 0).single();
        assert!(ancient.is_some());
        if let Some(date) = ancient {
            assert!(lunar_info(date).illumination <= 100);
        }
    }

    #[test]
    fn illumination_stays_in_bounds_over_many_days() {
        let start = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).single();
        let Some(start) = start else {
            return;
        };
        for offset in 0..2_000 {
            let info = lunar_info(start + Duration::hours(offset * 13));
            assert!(info.illumination <= 100);
            assert!(info.age_days >= 0.0 && info.age_days < SYNODIC_MONTH_DAYS);
        }
    }

    #[test]
    fn phase_serializes_with_spanish_names() {
        let json = serde_json::to_value(lunar_info(reference_new_moon())).unwrap_or_default();
        assert_eq!(json["phase"], "Nueva");
        assert_eq!(json["day_type"], "Descanso");
    }
}
