//! The agronomic advisor: every question the service asks the model.
//!
//! Each operation renders a prompt, runs it through the
//! [`ResilientClient`], and parses the answer. Translations never fail:
//! on any error the input is returned unchanged.

use base64::Engine as _;
use chrono::NaiveDate;
use finquina_agro::RotationCategory;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analysis::{CropAnalysis, RotationAdvice};
use crate::config::AiConfig;
use crate::error::AiError;
use crate::gemini::Part;
use crate::parse::{clean_translation, parse_model_json};
use crate::prompt::{CropContext, CropView, FarmProfile, PromptEngine, spanish_date, spanish_weekday_date};
use crate::resilience::ResilientClient;

/// MIME type assumed when a download does not declare one.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Where a photo to analyse comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A public `http(s)` URL to download.
    Url(String),
    /// Bytes already in memory (e.g. read from the local blob store).
    Bytes {
        /// MIME type of the image.
        mime_type: String,
        /// Raw image bytes.
        data: Vec<u8>,
    },
}

/// Inputs for the dashboard's daily advice.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyContext {
    /// Today's date.
    pub today: NaiveDate,
    /// Current temperature in °C.
    pub temperature: Option<f64>,
    /// Current relative humidity in percent.
    pub humidity: Option<f64>,
    /// Titles of a few pending tasks.
    pub pending_tasks: Vec<String>,
    /// Names of a few active crops.
    pub active_crops: Vec<String>,
    /// Spending so far this month.
    pub monthly_spending: Decimal,
}

/// Inputs for a bed rotation recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationRequest {
    /// The bed.
    pub bed: String,
    /// Crop currently in the bed.
    pub crop_name: String,
    /// Its rotation group.
    pub current: RotationCategory,
    /// Names of previous crops in the bed, newest first.
    pub history: Vec<String>,
}

#[derive(Serialize)]
struct CropPrompt<'a> {
    crop: CropView,
    note: &'a str,
    today: String,
}

#[derive(Serialize)]
struct DailyPrompt<'a> {
    today: String,
    temperature: String,
    humidity: String,
    pending_tasks: &'a [String],
    active_crops: &'a [String],
    monthly_spending: String,
}

#[derive(Serialize)]
struct RotationPrompt<'a> {
    bed: &'a str,
    crop_name: &'a str,
    current_category: &'static str,
    history: &'a [String],
}

#[derive(Serialize)]
struct TranslatePrompt<'a> {
    text: &'a str,
}

/// High-level advisor operations.
#[derive(Debug)]
pub struct Advisor {
    client: ResilientClient,
    prompts: PromptEngine,
    http: reqwest::Client,
}

impl Advisor {
    /// Build an advisor from configuration.
    pub fn new(config: &AiConfig, profile: &FarmProfile) -> Result<Self, AiError> {
        let prompts = match config.templates_dir.as_deref() {
            Some(dir) => PromptEngine::with_overrides(profile, std::path::Path::new(dir))?,
            None => PromptEngine::embedded(profile)?,
        };
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Ok(Self {
            client: ResilientClient::new(config),
            prompts,
            http,
        })
    }

    /// Assemble an advisor from parts.
    pub fn from_parts(client: ResilientClient, prompts: PromptEngine) -> Self {
        Self {
            client,
            prompts,
            http: reqwest::Client::new(),
        }
    }

    /// Whether any API key is configured.
    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Analyse a crop photo with its context.
    pub async fn analyze_crop_image(
        &self,
        image: ImageSource,
        note: Option<&str>,
        context: &CropContext,
        today: NaiveDate,
    ) -> Result<CropAnalysis, AiError> {
        let (mime_type, bytes) = self.load_image(image).await?;
        if bytes.is_empty() {
            return Err(AiError::Image("could not load image for analysis".to_owned()));
        }
        let data = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let prompt = self.prompts.render(
            "crop_image",
            &CropPrompt {
                crop: CropView::from(context),
                note: note.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Sin notas"),
                today: spanish_date(today),
            },
        )?;
        let parts = [Part::text(prompt), Part::InlineData { mime_type, data }];

        let raw = self
            .client
            .run_with_resilience(|model| {
                let parts = parts.clone();
                async move { model.generate(&parts).await }
            })
            .await?;
        parse_model_json(&raw)
    }

    /// Analyse a written field note with its context.
    pub async fn analyze_crop_note(
        &self,
        note: &str,
        context: &CropContext,
        today: NaiveDate,
    ) -> Result<CropAnalysis, AiError> {
        let prompt = self.prompts.render(
            "crop_note",
            &CropPrompt {
                crop: CropView::from(context),
                note,
                today: spanish_date(today),
            },
        )?;
        let raw = self.generate_text(&prompt).await?;
        parse_model_json(&raw)
    }

    /// A short motivational summary for today.
    pub async fn daily_advice(&self, context: &DailyContext) -> Result<String, AiError> {
        let reading = |value: Option<f64>| value.map_or_else(|| "?".to_owned(), |v| format!("{v:.0}"));
        let prompt = self.prompts.render(
            "daily_advice",
            &DailyPrompt {
                today: spanish_weekday_date(context.today),
                temperature: reading(context.temperature),
                humidity: reading(context.humidity),
                pending_tasks: &context.pending_tasks,
                active_crops: &context.active_crops,
                monthly_spending: context.monthly_spending.round_dp(2).to_string(),
            },
        )?;
        let advice = self.generate_text(&prompt).await?;
        Ok(advice.trim().to_owned())
    }

    /// Recommend the next crop for a bed.
    pub async fn rotation_advice(&self, request: &RotationRequest) -> Result<RotationAdvice, AiError> {
        let prompt = self.prompts.render(
            "rotation",
            &RotationPrompt {
                bed: &request.bed,
                crop_name: &request.crop_name,
                current_category: request.current.as_str(),
                history: &request.history,
            },
        )?;
        let raw = self.generate_text(&prompt).await?;
        parse_model_json(&raw)
    }

    /// Spanish plant name to English, or the input on failure.
    pub async fn translate_to_english(&self, text: &str) -> String {
        self.translate("translate_to_english", text).await
    }

    /// English plant name to Spanish, or the input on failure.
    pub async fn translate_to_spanish(&self, text: &str) -> String {
        self.translate("translate_to_spanish", text).await
    }

    async fn translate(&self, template: &str, text: &str) -> String {
        let result = match self.prompts.render(template, &TranslatePrompt { text }) {
            Ok(prompt) => self.generate_text(&prompt).await,
            Err(err) => Err(err),
        };
        match result.map(|raw| clean_translation(&raw)) {
            Ok(translated) if !translated.is_empty() => translated,
            Ok(_) => text.to_owned(),
            Err(err) => {
                tracing::debug!(error = %err, text, "Translation failed, keeping original");
                text.to_owned()
            }
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        self.client
            .run_with_resilience(|model| async move { model.generate_text(prompt).await })
            .await
    }

    async fn load_image(&self, image: ImageSource) -> Result<(String, Vec<u8>), AiError> {
        match image {
            ImageSource::Bytes { mime_type, data } => Ok((mime_type, data)),
            ImageSource::Url(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(AiError::Image(format!("unsupported image location: {url}")));
                }
                let response = self
                    .http
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| AiError::Image(format!("failed to fetch image: {e}")))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AiError::Image(format!("failed to fetch image: {status}")));
                }
                let mime_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map_or_else(|| DEFAULT_IMAGE_MIME.to_owned(), ToOwned::to_owned);
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| AiError::Image(format!("failed to read image body: {e}")))?;
                Ok((mime_type, bytes.to_vec()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_advisor() -> Option<Advisor> {
        Advisor::new(&AiConfig::default(), &FarmProfile::default()).ok()
    }

    #[tokio::test]
    async fn translations_fall_back_without_providers() {
        let Some(advisor) = offline_advisor() else {
            return;
        };
        assert!(!advisor.is_configured());
        assert_eq!(advisor.translate_to_english("Tomate").await, "Tomate");
        assert_eq!(advisor.translate_to_spanish("Tomato").await, "Tomato");
    }

    #[tokio::test]
    async fn analysis_without_providers_fails() {
        let Some(advisor) = offline_advisor() else {
            return;
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default();
        let result = advisor
            .analyze_crop_note("Hojas amarillas", &CropContext::default(), today)
            .await;
        assert!(matches!(result, Err(AiError::NoProviders)));
    }

    #[tokio::test]
    async fn empty_image_is_rejected_before_any_call() {
        let Some(advisor) = offline_advisor() else {
            return;
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default();
        let result = advisor
            .analyze_crop_image(
                ImageSource::Bytes {
                    mime_type: "image/png".to_owned(),
                    data: Vec::new(),
                },
                None,
                &CropContext::default(),
                today,
            )
            .await;
        assert!(matches!(result, Err(AiError::Image(_))));
    }

    #[tokio::test]
    async fn relative_image_paths_are_rejected() {
        let Some(advisor) = offline_advisor() else {
            return;
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default();
        let result = advisor
            .analyze_crop_image(
                ImageSource::Url("/uploads/foto.jpg".to_owned()),
                None,
                &CropContext::default(),
                today,
            )
            .await;
        assert!(matches!(result, Err(AiError::Image(_))));
    }
}
