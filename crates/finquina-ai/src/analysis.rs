//! Structured advisor answers and how they are written into the journal.

use finquina_agro::health::TIPS_MARKER;
use finquina_agro::harvest::HARVEST_MARKER;
use finquina_agro::{RotationCategory, next_in_rotation};
use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Stored in place of an analysis when the advisor failed.
pub const ANALYSIS_FAILED: &str = "Error en análisis";

/// Health label the model uses for a crop in good condition.
pub const HEALTHY: &str = "Bueno";

/// The advisor's reading of a crop photo or field note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropAnalysis {
    /// What the model thinks the plant is.
    pub identification: String,
    /// `Bueno`, `Regular` or `Malo`.
    pub health: String,
    /// Detailed diagnosis.
    pub diagnosis: String,
    /// Assessment of the neighbours.
    pub compatibility: String,
    /// Expected harvest date or period.
    pub harvest_estimation: String,
    /// Concrete agronomic tasks.
    pub agronomic_tips: Vec<String>,
    /// General advice.
    pub advice: String,
    /// Maintenance tasks to schedule.
    pub suggested_tasks: Vec<String>,
}

impl CropAnalysis {
    /// Whether the crop was judged healthy.
    pub fn is_healthy(&self) -> bool {
        self.health.trim() == HEALTHY
    }

    /// Multi-section text stored on a crop's progress log.
    ///
    /// The harvest and tips sections carry the markers the calendar and
    /// dashboard parse back out.
    pub fn progress_report(&self) -> String {
        let mut report = if self.diagnosis.trim().is_empty() {
            self.advice.clone()
        } else {
            self.diagnosis.clone()
        };
        if !self.compatibility.trim().is_empty() {
            report.push_str(&format!("\n\n🧩 Compatibilidad: {}", self.compatibility));
        }
        if !self.harvest_estimation.trim().is_empty() {
            report.push_str(&format!("\n\n📆 {HARVEST_MARKER} {}", self.harvest_estimation));
        }
        if !self.agronomic_tips.is_empty() {
            report.push_str(&format!("\n\n💡 {TIPS_MARKER}{}", self.agronomic_tips.join(". ")));
        }
        report.push_str(&format!("\n\nSalud: {}", self.health));
        report
    }

    /// One-line summary stored on a journal entry.
    pub fn journal_summary(&self) -> String {
        format!(
            "[{}] Salud: {}. {}. Consejo: {}",
            self.identification, self.health, self.diagnosis, self.advice
        )
    }
}

/// Journal text recorded when the advisor could not analyse a photo.
pub fn journal_error_summary(err: &AiError) -> String {
    if err.is_quota() {
        "⚠️ Error IA: Cuota excedida".to_owned()
    } else {
        "⚠️ Error IA: Error de conexión".to_owned()
    }
}

/// What to plant next in a bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationAdvice {
    /// Recommended rotation group.
    pub recommended_category: String,
    /// Short technical justification.
    #[serde(default)]
    pub justification: String,
    /// Local varieties to consider.
    #[serde(default)]
    pub suggested_varieties: Vec<String>,
    /// `Alta`, `Media` or `Baja`.
    #[serde(default)]
    pub urgency: String,
}

impl RotationAdvice {
    /// Static advice from the rotation table, used when the model fails.
    pub fn fallback(current: RotationCategory) -> Self {
        let next = next_in_rotation(current);
        Self {
            recommended_category: next.as_str().to_owned(),
            justification: format!(
                "Siguiendo la rotación científica estándar: {}",
                next.description()
            ),
            suggested_varieties: vec![
                "Habas Asturianas".to_owned(),
                "Pimientos de Padrón".to_owned(),
            ],
            urgency: "Media".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> CropAnalysis {
        CropAnalysis {
            identification: "Tomate".to_owned(),
            health: "Regular".to_owned(),
            diagnosis: "Mildiu incipiente".to_owned(),
            compatibility: "Buena con albahaca".to_owned(),
            harvest_estimation: "finales de agosto".to_owned(),
            agronomic_tips: vec!["Retirar hojas bajas".to_owned(), "Aplicar cobre".to_owned()],
            advice: "Vigilar humedad".to_owned(),
            suggested_tasks: vec!["Tratar con caldo bordelés".to_owned()],
        }
    }

    #[test]
    fn progress_report_sections() {
        let report = analysis().progress_report();
        assert!(report.starts_with("Mildiu incipiente"));
        assert!(report.contains("\n\n🧩 Compatibilidad: Buena con albahaca"));
        assert!(report.contains("Cosecha estimada: finales de agosto"));
        assert!(report.contains("Consejos Agronómicos: Retirar hojas bajas. Aplicar cobre"));
        assert!(report.ends_with("\n\nSalud: Regular"));
    }

    #[test]
    fn progress_report_uses_advice_without_diagnosis() {
        let report = CropAnalysis {
            advice: "Todo en orden".to_owned(),
            health: "Bueno".to_owned(),
            ..CropAnalysis::default()
        }
        .progress_report();
        assert_eq!(report, "Todo en orden\n\nSalud: Bueno");
    }

    #[test]
    fn report_round_trips_through_agro_parsers() {
        let report = analysis().progress_report();
        assert_eq!(
            finquina_agro::agronomic_tips(&report),
            vec!["Retirar hojas bajas", "Aplicar cobre"]
        );
        assert_eq!(
            finquina_agro::harvest::extract_harvest_line(&report),
            Some("finales de agosto")
        );
    }

    #[test]
    fn journal_summary_format() {
        assert_eq!(
            analysis().journal_summary(),
            "[Tomate] Salud: Regular. Mildiu incipiente. Consejo: Vigilar humedad"
        );
        assert!(!analysis().is_healthy());
    }

    #[test]
    fn analysis_accepts_partial_json() {
        let parsed: Result<CropAnalysis, _> =
            serde_json::from_str(r#"{"health":"Bueno","agronomicTips":["Acolchar"]}"#);
        assert!(parsed.is_ok_and(|a| a.is_healthy() && a.suggested_tasks.is_empty()));
    }

    #[test]
    fn rotation_fallback_follows_cycle() {
        let advice = RotationAdvice::fallback(RotationCategory::Fruto);
        assert_eq!(advice.recommended_category, "RAIZ");
        assert!(advice.justification.starts_with("Siguiendo la rotación científica estándar: "));
        assert_eq!(advice.urgency, "Media");
        assert_eq!(advice.suggested_varieties.len(), 2);
    }
}
