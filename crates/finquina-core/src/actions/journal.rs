//! Photo journal actions.
//!
//! A journal entry is a note and/or photo attached to a crop, plus the
//! advisor's reading of it. When the advisor fails the entry is still
//! stored, with a short error marker in place of the analysis.

use chrono::{NaiveDate, Utc};
use finquina_ai::{
    ANALYSIS_FAILED, AiError, CropAnalysis, CropContext, ImageSource, journal_error_summary,
};
use finquina_types::{
    Crop, CropId, CropLog, CropLogEntry, CropLogId, NewCropLog, NewTask, TaskCategory,
    TaskPriority, non_empty,
};
use serde::Serialize;

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, written};
use crate::revalidate::{CALENDAR, HOME, JOURNAL, TASKS, crop_path};

/// Entries shown in the activity feed.
pub const RECENT_LOGS: i64 = 5;

/// Result of logging a crop's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressOutcome {
    /// The stored entry, if the database accepted it.
    pub log: Option<CropLog>,
    /// The advisor's reading, if it answered.
    pub analysis: Option<CropAnalysis>,
}

/// Result of a quick journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalOutcome {
    /// The stored entry; `None` when there is no crop to attach it to.
    pub log: Option<CropLog>,
    /// The advisor's reading, if it answered.
    pub analysis: Option<CropAnalysis>,
    /// How many suggested tasks were created.
    pub tasks_created: usize,
}

fn crop_context(crop: &Crop, neighbours: &[Crop]) -> CropContext {
    CropContext {
        name: Some(crop.name.clone()),
        variety: crop.variety.clone(),
        bed: crop.bed.clone(),
        row: crop.row.clone(),
        planted_at: Some(crop.planted_at),
        neighbours: neighbours.iter().map(Crop::neighbour_label).collect(),
    }
}

/// Views touched by a new crop log. The dashboard reads recent logs for
/// the health score and agronomic tips.
fn progress_paths(crop_id: CropId) -> [String; 4] {
    [
        crop_path(crop_id),
        HOME.to_owned(),
        JOURNAL.to_owned(),
        CALENDAR.to_owned(),
    ]
}

impl Farm {
    /// Resolve an image URL: local uploads are read from the blob
    /// store, anything else is left for the advisor to download.
    async fn image_source(&self, url: &str) -> Result<ImageSource, AiError> {
        if !self.blobs.owns(url) {
            return Ok(ImageSource::Url(url.to_owned()));
        }
        match self.blobs.read(url).await {
            Ok(Some((mime_type, data))) => Ok(ImageSource::Bytes { mime_type, data }),
            Ok(None) => {
                tracing::warn!(url, "Uploaded image not found");
                Err(AiError::Image(format!("{url} not found")))
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Uploaded image unreadable");
                Err(AiError::Image(e.to_string()))
            }
        }
    }

    async fn analyze_image(
        &self,
        url: &str,
        note: Option<&str>,
        context: &CropContext,
        today: NaiveDate,
    ) -> Result<CropAnalysis, AiError> {
        let image = self.image_source(url).await?;
        self.advisor
            .analyze_crop_image(image, note, context, today)
            .await
    }

    /// Record a crop observation with the advisor's analysis.
    ///
    /// Planted neighbours in the same bed and row are passed to the
    /// advisor for the compatibility section. Returns `None` when the
    /// crop does not exist.
    pub async fn log_crop_progress(
        &self,
        crop_id: CropId,
        image_url: Option<&str>,
        note: &str,
    ) -> Option<ProgressOutcome> {
        let crop = read_or_default("log_progress_crop", self.db.crops().find(crop_id).await)?;
        let neighbours =
            read_or_default("log_progress_neighbours", self.db.crops().neighbours(&crop).await);
        let context = crop_context(&crop, &neighbours);
        let today = Utc::now().date_naive();
        let image_url = image_url.map(str::trim).filter(|u| !u.is_empty());

        let result = match image_url {
            Some(url) => self.analyze_image(url, Some(note), &context, today).await,
            None => self.advisor.analyze_crop_note(note, &context, today).await,
        };

        let (ai_analysis, analysis) = match result {
            Ok(analysis) => (analysis.progress_report(), Some(analysis)),
            Err(e) => {
                tracing::warn!(crop_id = %crop_id, error = %e, "Crop analysis failed");
                (ANALYSIS_FAILED.to_owned(), None)
            }
        };

        let new = NewCropLog {
            crop_id,
            image_url: image_url.map(ToOwned::to_owned),
            note: non_empty(Some(note)),
            ai_analysis: Some(ai_analysis),
            date: Utc::now(),
        };
        let log = written("log_crop_progress", self.db.crop_logs().insert(&new).await);
        if log.is_some() {
            self.revalidate(&progress_paths(crop_id));
        }
        Some(ProgressOutcome { log, analysis })
    }

    /// Analyse a photo without crop context and file it.
    ///
    /// Suggested tasks are created (high priority unless the crop looks
    /// healthy) and the entry is attached to the first crop on record.
    pub async fn create_journal_entry(
        &self,
        image_url: &str,
        note: Option<&str>,
    ) -> Result<JournalOutcome, ActionError> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(ActionError::Invalid(
                "Se necesita una imagen para el análisis".to_owned(),
            ));
        }
        let note = non_empty(note);

        let result = self
            .analyze_image(
                image_url,
                note.as_deref(),
                &CropContext::default(),
                Utc::now().date_naive(),
            )
            .await;

        let mut tasks_created: usize = 0;
        let (summary, analysis) = match result {
            Ok(analysis) => {
                tasks_created = self.create_suggested_tasks(&analysis).await;
                (analysis.journal_summary(), Some(analysis))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Journal photo analysis failed");
                (journal_error_summary(&e), None)
            }
        };

        let log = match read_or_default("journal_first_crop", self.db.crops().first().await) {
            Some(crop) => {
                let new = NewCropLog {
                    crop_id: crop.id,
                    image_url: Some(image_url.to_owned()),
                    note,
                    ai_analysis: Some(summary),
                    date: Utc::now(),
                };
                written("create_journal_entry", self.db.crop_logs().insert(&new).await)
            }
            None => {
                tracing::warn!("No crops registered; journal entry not stored");
                None
            }
        };

        if tasks_created > 0 {
            self.revalidate(&[HOME, JOURNAL, TASKS]);
        } else {
            self.revalidate(&[HOME, JOURNAL]);
        }
        Ok(JournalOutcome {
            log,
            analysis,
            tasks_created,
        })
    }

    async fn create_suggested_tasks(&self, analysis: &CropAnalysis) -> usize {
        let priority = if analysis.is_healthy() {
            TaskPriority::Normal
        } else {
            TaskPriority::High
        };
        let titles = analysis
            .suggested_tasks
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let mut created: usize = 0;
        for title in titles {
            let task = NewTask {
                title: title.to_owned(),
                description: Some(format!("Sugerido por IA para {}", analysis.identification)),
                category: TaskCategory::Garden,
                priority,
                ..NewTask::default()
            };
            if written("suggested_task", self.db.tasks().insert(&task).await).is_some() {
                created = created.saturating_add(1);
            }
        }
        created
    }

    /// The latest entries for the activity feed.
    pub async fn recent_logs(&self) -> Vec<CropLogEntry> {
        read_or_default("recent_logs", self.db.crop_logs().recent(RECENT_LOGS).await)
    }

    /// Every entry, newest observation first.
    pub async fn all_logs(&self) -> Vec<CropLogEntry> {
        read_or_default("all_logs", self.db.crop_logs().all().await)
    }

    /// Delete an entry and its uploaded photo.
    pub async fn delete_log(&self, id: CropLogId) -> bool {
        let log = read_or_default("delete_log_find", self.db.crop_logs().find(id).await);
        let photo = log
            .as_ref()
            .and_then(|l| l.image_url.as_deref())
            .filter(|url| self.blobs.owns(url));
        if let Some(url) = photo {
            let removed = self.blobs.delete(url).await;
            if let Err(e) = removed {
                tracing::warn!(url, error = %e, "Failed to delete journal photo");
            }
        }

        let deleted = written("delete_log", self.db.crop_logs().delete(id).await).unwrap_or(false);
        if deleted {
            self.revalidate(&[HOME, JOURNAL]);
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use finquina_types::CropStatus;

    use crate::testing::offline_farm;

    use super::*;

    fn crop(name: &str, variety: Option<&str>) -> Crop {
        Crop {
            id: CropId(1),
            name: name.to_owned(),
            variety: variety.map(ToOwned::to_owned),
            status: CropStatus::Planted,
            planted_at: Utc::now(),
            harvest_date: None,
            location: None,
            bed: Some("Bancal 2".to_owned()),
            row: Some("B".to_owned()),
            image_url: None,
            latitude: None,
            longitude: None,
            notes: None,
        }
    }

    #[test]
    fn context_lists_neighbour_labels() {
        let context = crop_context(
            &crop("Tomate", Some("Rosa")),
            &[crop("Albahaca", None), crop("Cebolla", Some("Babosa"))],
        );
        assert_eq!(context.name.as_deref(), Some("Tomate"));
        assert_eq!(context.bed.as_deref(), Some("Bancal 2"));
        assert_eq!(context.neighbours, vec!["Albahaca", "Cebolla (Babosa)"]);
    }

    #[test]
    fn progress_refreshes_dashboard_and_crop_page() {
        let paths = progress_paths(CropId(4));
        assert!(paths.contains(&HOME.to_owned()));
        assert!(paths.contains(&crop_path(CropId(4))));
    }

    #[tokio::test]
    async fn progress_for_unknown_crop_is_none() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(farm.log_crop_progress(CropId(9), None, "Hojas amarillas").await.is_none());
    }

    #[tokio::test]
    async fn journal_entry_needs_an_image() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(matches!(
            farm.create_journal_entry("  ", None).await,
            Err(ActionError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn journal_entry_without_providers_is_not_stored() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let Ok(blob) = farm.blobs().put("hoja.jpg", b"jpeg").await else {
            return;
        };
        let outcome = farm.create_journal_entry(&blob.url, Some("Manchas")).await;
        assert!(outcome.is_ok_and(|o| o.analysis.is_none() && o.log.is_none() && o.tasks_created == 0));
    }

    #[tokio::test]
    async fn local_uploads_are_read_from_the_store() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let Ok(blob) = farm.blobs().put("hoja.png", b"png").await else {
            return;
        };
        assert!(farm.image_source(&blob.url).await.is_ok_and(|image| image
            == ImageSource::Bytes {
                mime_type: "image/png".to_owned(),
                data: b"png".to_vec(),
            }));
        assert!(
            farm.image_source("https://cdn.example.com/a.jpg")
                .await
                .is_ok_and(|image| image == ImageSource::Url("https://cdn.example.com/a.jpg".to_owned()))
        );
    }

    #[tokio::test]
    async fn missing_upload_is_an_image_error() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let url = "/uploads/no-existe.jpg";
        assert!(farm.blobs().owns(url));
        assert!(matches!(farm.image_source(url).await, Err(AiError::Image(_))));

        let outcome = farm.create_journal_entry(url, None).await;
        assert!(outcome.is_ok_and(|o| o.analysis.is_none() && o.tasks_created == 0));
    }
}
