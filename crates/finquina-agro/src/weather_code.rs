//! WMO weather codes and forecast alerts.

use serde::Serialize;

/// Below this forecast minimum (°C) a frost alert fires.
pub const FROST_THRESHOLD_C: f64 = 2.0;

/// Above this daily precipitation (mm) a heavy-rain alert fires.
pub const HEAVY_RAIN_THRESHOLD_MM: f64 = 10.0;

/// Label and advice shown for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherTheme {
    /// Short description of the sky.
    pub label: &'static str,
    /// What it means for the farm.
    pub message: &'static str,
}

/// Map a WMO weather code to its theme.
pub const fn weather_theme(code: i32) -> WeatherTheme {
    let (label, message) = match code {
        0 => (
            "Día Soleado",
            "¡Cuidado con la evaporación! Riego recomendado.",
        ),
        1..=3 => ("Cielos Claros", "Buena luz para fotos de seguimiento."),
        45 | 48 => (
            "Niebla en la Finca",
            "Alta humedad ambiental. Atento a los hongos.",
        ),
        51..=67 | 80..=82 => (
            "Lloviendo",
            "La tierra se hidrata. Buen día para tareas de interior.",
        ),
        71..=77 => ("Nevada", "Protege los cultivos sensibles al frío."),
        95.. => ("Tormenta Eléctrica", "Riesgo extremo. Mantente a cubierto."),
        _ => (
            "Tiempo Variable",
            "Momento ideal para revisar el invernadero.",
        ),
    };
    WeatherTheme { label, message }
}

/// Kind of forecast alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlertKind {
    /// A forecast minimum below [`FROST_THRESHOLD_C`].
    Frost,
    /// A forecast day above [`HEAVY_RAIN_THRESHOLD_MM`].
    Rain,
}

/// A forecast alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherAlert {
    /// Alert kind.
    #[serde(rename = "type")]
    pub kind: AlertKind,
    /// Human-readable message.
    pub message: &'static str,
}

/// Alerts raised by a daily forecast.
///
/// At most one alert of each kind is returned, frost first.
pub fn forecast_alerts(daily_min_temps: &[f64], daily_precipitation: &[f64]) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();
    if daily_min_temps.iter().any(|t| *t < FROST_THRESHOLD_C) {
        alerts.push(WeatherAlert {
            kind: AlertKind::Frost,
            message: "Riesgo de helada detectado",
        });
    }
    if daily_precipitation
        .iter()
        .any(|p| *p > HEAVY_RAIN_THRESHOLD_MM)
    {
        alerts.push(WeatherAlert {
            kind: AlertKind::Rain,
            message: "Lluvias fuertes previstas",
        });
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_themes() {
        assert_eq!(weather_theme(0).label, "Día Soleado");
        assert_eq!(weather_theme(2).label, "Cielos Claros");
        assert_eq!(weather_theme(48).label, "Niebla en la Finca");
        assert_eq!(weather_theme(61).label, "Lloviendo");
        assert_eq!(weather_theme(81).label, "Lloviendo");
        assert_eq!(weather_theme(73).label, "Nevada");
        assert_eq!(weather_theme(99).label, "Tormenta Eléctrica");
        assert_eq!(weather_theme(30).label, "Tiempo Variable");
        assert_eq!(weather_theme(-1).label, "Tiempo Variable");
    }

    #[test]
    fn frost_and_rain_alerts() {
        let alerts = forecast_alerts(&[5.0, 1.5, 3.0], &[0.0, 12.0, 0.0]);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts.first().map(|a| a.kind), Some(AlertKind::Frost));
        assert_eq!(alerts.get(1).map(|a| a.kind), Some(AlertKind::Rain));
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(forecast_alerts(&[2.0], &[10.0]).is_empty());
        assert!(forecast_alerts(&[], &[]).is_empty());
    }

    #[test]
    fn alert_kind_serializes_as_type() {
        let alerts = forecast_alerts(&[0.0], &[]);
        let json = serde_json::to_value(&alerts).unwrap_or_default();
        assert_eq!(json[0]["type"], "Frost");
        assert_eq!(json[0]["message"], "Riesgo de helada detectado");
    }
}
