//! Harvest date heuristics over stored AI analyses.
//!
//! Analyses carry a free-text line such as
//! `📆 Cosecha estimada: finales de julio 2025`. The calendar pulls out
//! that line, looks for a Spanish month name and an optional year, and
//! turns it into a sortable mid-month date.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Marker that precedes the prediction inside an analysis.
pub const HARVEST_MARKER: &str = "Cosecha estimada:";

/// Shown when no prediction could be extracted.
pub const PENDING_TEXT: &str = "Pendiente de análisis";

/// Month label used for entries without a date.
pub const PENDING_MONTH: &str = "Pendiente";

/// Spanish month names, January first.
pub const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A parsed harvest prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestPrediction {
    /// The prediction text, or [`PENDING_TEXT`].
    pub prediction: String,
    /// Mid-month date used for sorting; `None` sorts last.
    pub sort_date: Option<NaiveDate>,
    /// `julio de 2025`, or [`PENDING_MONTH`].
    pub month_label: String,
}

impl HarvestPrediction {
    fn pending(prediction: String) -> Self {
        Self {
            prediction,
            sort_date: None,
            month_label: PENDING_MONTH.to_owned(),
        }
    }

    /// Ordering key: dated entries first, by date.
    pub fn sort_key(&self) -> (bool, Option<NaiveDate>) {
        (self.sort_date.is_none(), self.sort_date)
    }
}

/// Pull the text after [`HARVEST_MARKER`] up to the end of its line.
pub fn extract_harvest_line(analysis: &str) -> Option<&str> {
    let start = analysis.find(HARVEST_MARKER)?.checked_add(HARVEST_MARKER.len())?;
    let rest = analysis.get(start..)?;
    let line = rest.split('\n').next().unwrap_or(rest).trim();
    (!line.is_empty()).then_some(line)
}

/// Index (0-based) of the first Spanish month mentioned in `text`.
fn find_month(text: &str) -> Option<u32> {
    MONTHS_ES
        .iter()
        .position(|m| text.contains(m))
        .and_then(|i| u32::try_from(i).ok())
}

/// First four-digit year `20xx` in `text`.
fn find_year(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    bytes.windows(4).find_map(|w| {
        let is_year = w.first() == Some(&b'2')
            && w.get(1) == Some(&b'0')
            && w.iter().all(u8::is_ascii_digit);
        if is_year {
            std::str::from_utf8(w).ok()?.parse().ok()
        } else {
            None
        }
    })
}

/// Predict the harvest month from an analysis relative to `today`.
///
/// Without an explicit year, a month earlier than the current one is
/// assumed to fall next year.
pub fn predict_harvest(analysis: Option<&str>, today: NaiveDate) -> HarvestPrediction {
    let Some(line) = analysis.and_then(extract_harvest_line) else {
        return HarvestPrediction::pending(PENDING_TEXT.to_owned());
    };

    let lower = line.to_lowercase();
    let Some(month_index) = find_month(&lower) else {
        return HarvestPrediction::pending(line.to_owned());
    };

    let year = find_year(&lower).unwrap_or_else(|| {
        if month_index < today.month0() {
            today.year().saturating_add(1)
        } else {
            today.year()
        }
    });

    let sort_date = NaiveDate::from_ymd_opt(year, month_index.saturating_add(1), 15);
    let month_name = MONTHS_ES
        .get(month_index as usize)
        .copied()
        .unwrap_or_default();

    match sort_date {
        Some(date) => HarvestPrediction {
            prediction: line.to_owned(),
            sort_date: Some(date),
            month_label: format!("{month_name} de {year}"),
        },
        None => HarvestPrediction::pending(line.to_owned()),
    }
}
