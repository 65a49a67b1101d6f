//! Harvest calendar.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use finquina_agro::{HarvestPrediction, predict_harvest};
use finquina_types::{Crop, CropId, CropLog, CropStatus};
use serde::Serialize;

use crate::farm::{Farm, read_or_default};

/// A planted crop with its expected harvest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    /// The crop.
    pub crop: Crop,
    /// Prediction parsed from the crop's latest analysis.
    #[serde(flatten)]
    pub harvest: HarvestPrediction,
}

/// Pair crops with their latest analysis and sort by expected harvest.
///
/// Crops without a dated prediction go last, in input order.
pub fn build_calendar(
    crops: Vec<Crop>,
    latest: &HashMap<CropId, CropLog>,
    today: NaiveDate,
) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = crops
        .into_iter()
        .map(|crop| {
            let analysis = latest.get(&crop.id).and_then(|l| l.ai_analysis.as_deref());
            CalendarEntry {
                harvest: predict_harvest(analysis, today),
                crop,
            }
        })
        .collect();
    entries.sort_by_key(|e| e.harvest.sort_key());
    entries
}

impl Farm {
    /// Planted crops ordered by expected harvest.
    pub async fn harvest_calendar(&self) -> Vec<CalendarEntry> {
        let crops = self.db.crops();
        let logs = self.db.crop_logs();
        let (planted, latest) = tokio::join!(
            crops.list_by_status(CropStatus::Planted, None),
            logs.latest_per_crop(),
        );
        build_calendar(
            read_or_default("calendar_crops", planted),
            &read_or_default("calendar_logs", latest),
            Utc::now().date_naive(),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use finquina_agro::harvest::PENDING_MONTH;
    use finquina_types::CropLogId;

    use super::*;

    fn crop(id: i64, name: &str) -> Crop {
        Crop {
            id: CropId(id),
            name: name.to_owned(),
            variety: None,
            status: CropStatus::Planted,
            planted_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().unwrap_or_default(),
            harvest_date: None,
            location: None,
            bed: None,
            row: None,
            image_url: None,
            latitude: None,
            longitude: None,
            notes: None,
        }
    }

    fn log(crop_id: i64, analysis: &str) -> CropLog {
        CropLog {
            id: CropLogId(crop_id),
            crop_id: CropId(crop_id),
            date: Utc::now(),
            created_at: Utc::now(),
            image_url: None,
            note: None,
            ai_analysis: Some(analysis.to_owned()),
        }
    }

    #[test]
    fn undated_crops_sort_last() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap_or_default();
        let mut latest = HashMap::new();
        latest.insert(CropId(2), log(2, "Cosecha estimada: julio\n"));
        latest.insert(CropId(3), log(3, "Cosecha estimada: junio\n"));

        let calendar = build_calendar(
            vec![crop(1, "Ajo"), crop(2, "Tomate"), crop(3, "Lechuga")],
            &latest,
            today,
        );
        let order: Vec<i64> = calendar.iter().map(|e| e.crop.id.into_inner()).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert!(calendar.last().is_some_and(|e| e.harvest.month_label == PENDING_MONTH));
    }
}
