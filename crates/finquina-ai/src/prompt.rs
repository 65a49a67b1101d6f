//! Prompt templates rendered with `minijinja`.
//!
//! The default templates are compiled into the binary. An operator can
//! point `GEMINI_TEMPLATES_DIR` at a directory holding files of the same
//! name (`crop_image.j2`, `rotation.j2`, ...) to tune the wording without
//! recompiling; files that are absent keep the embedded version.

use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use finquina_agro::harvest::MONTHS_ES;
use minijinja::Environment;
use serde::Serialize;

use crate::error::AiError;

/// Template names and their embedded sources.
const EMBEDDED: [(&str, &str); 6] = [
    ("crop_image", include_str!("../templates/crop_image.j2")),
    ("crop_note", include_str!("../templates/crop_note.j2")),
    ("daily_advice", include_str!("../templates/daily_advice.j2")),
    ("rotation", include_str!("../templates/rotation.j2")),
    ("translate_to_english", include_str!("../templates/translate_to_english.j2")),
    ("translate_to_spanish", include_str!("../templates/translate_to_spanish.j2")),
];

const WEEKDAYS_ES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// Who the advisor speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmProfile {
    /// Farm name used in prompts.
    pub name: String,
    /// Region, for climate and local varieties.
    pub region: String,
}

impl Default for FarmProfile {
    fn default() -> Self {
        Self {
            name: "La Finquina".to_owned(),
            region: "Asturias".to_owned(),
        }
    }
}

/// Manages prompt templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl core::fmt::Debug for PromptEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PromptEngine").finish_non_exhaustive()
    }
}

impl PromptEngine {
    /// Build an engine from the embedded templates.
    pub fn embedded(profile: &FarmProfile) -> Result<Self, AiError> {
        let mut env = Environment::new();
        for (name, source) in EMBEDDED {
            env.add_template(name, source)
                .map_err(|e| AiError::Template(format!("failed to add {name} template: {e}")))?;
        }
        env.add_global("farm_name", profile.name.clone());
        env.add_global("region", profile.region.clone());
        Ok(Self { env })
    }

    /// Build an engine, overriding embedded templates with files in `dir`.
    pub fn with_overrides(profile: &FarmProfile, dir: &Path) -> Result<Self, AiError> {
        let mut engine = Self::embedded(profile)?;
        for (name, _) in EMBEDDED {
            let path = dir.join(format!("{name}.j2"));
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|e| {
                AiError::Template(format!("failed to read {}: {e}", path.display()))
            })?;
            engine
                .env
                .add_template_owned(name, source)
                .map_err(|e| AiError::Template(format!("failed to add {name} override: {e}")))?;
            tracing::info!(template = name, path = %path.display(), "Prompt template overridden");
        }
        Ok(engine)
    }

    /// Render a named template with the given context.
    pub fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<String, AiError> {
        self.env
            .get_template(name)
            .map_err(|e| AiError::Template(format!("missing {name} template: {e}")))?
            .render(context)
            .map(|text| text.trim().to_owned())
            .map_err(|e| AiError::Template(format!("{name} render failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Prompt contexts
// ---------------------------------------------------------------------------

/// What the advisor knows about a crop when analysing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropContext {
    /// Crop name.
    pub name: Option<String>,
    /// Cultivar.
    pub variety: Option<String>,
    /// Bed name.
    pub bed: Option<String>,
    /// Row inside the bed.
    pub row: Option<String>,
    /// Planting date.
    pub planted_at: Option<DateTime<Utc>>,
    /// Labels of planted neighbours in the same bed and row.
    pub neighbours: Vec<String>,
}

/// Template-facing view of a [`CropContext`] with placeholders filled.
#[derive(Debug, Serialize)]
pub(crate) struct CropView {
    name: String,
    variety: String,
    bed: String,
    row: String,
    planted: String,
    neighbours: String,
}

impl From<&CropContext> for CropView {
    fn from(ctx: &CropContext) -> Self {
        let or = |value: Option<&String>, fallback: &str| {
            value
                .map(String::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_owned()
        };
        Self {
            name: or(ctx.name.as_ref(), "Desconocido"),
            variety: or(ctx.variety.as_ref(), "Desconocida"),
            bed: or(ctx.bed.as_ref(), "General"),
            row: or(ctx.row.as_ref(), "Sin fila"),
            planted: ctx
                .planted_at
                .map_or_else(|| "fecha desconocida".to_owned(), |d| short_date(d.date_naive())),
            neighbours: if ctx.neighbours.is_empty() {
                "Ninguno".to_owned()
            } else {
                ctx.neighbours.join(", ")
            },
        }
    }
}

/// `19 de octubre de 2026`.
pub fn spanish_date(date: NaiveDate) -> String {
    let month = usize::try_from(date.month0())
        .ok()
        .and_then(|i| MONTHS_ES.get(i))
        .copied()
        .unwrap_or_default();
    format!("{} de {month} de {}", date.day(), date.year())
}

/// `lunes, 19 de octubre de 2026`.
pub fn spanish_weekday_date(date: NaiveDate) -> String {
    let weekday = usize::try_from(date.weekday().num_days_from_monday())
        .ok()
        .and_then(|i| WEEKDAYS_ES.get(i))
        .copied()
        .unwrap_or_default();
    format!("{weekday}, {}", spanish_date(date))
}

/// `19/10/2026`.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PromptEngine {
        PromptEngine::embedded(&FarmProfile::default()).unwrap_or_else(|_| PromptEngine {
            env: Environment::new(),
        })
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default()
    }

    #[test]
    fn all_embedded_templates_render() {
        let engine = engine();
        let ctx = minijinja::context! {
            crop => CropView::from(&CropContext::default()),
            note => "Sin notas",
            today => "hoy",
            text => "Tomato",
            bed => "Bancal 1",
            crop_name => "Tomate",
            current_category => "FRUTO",
            history => Vec::<String>::new(),
            temperature => "15",
            humidity => "80",
            pending_tasks => Vec::<String>::new(),
            active_crops => Vec::<String>::new(),
            monthly_spending => "0",
        };
        for (name, _) in EMBEDDED {
            let rendered = engine.render(name, &ctx);
            assert!(rendered.is_ok(), "{name} failed: {rendered:?}");
        }
    }

    #[test]
    fn crop_prompt_fills_placeholders() {
        let view = CropView::from(&CropContext {
            name: Some("Tomate".to_owned()),
            neighbours: vec!["Albahaca".to_owned(), "Lechuga (Romana)".to_owned()],
            ..CropContext::default()
        });
        let text = engine()
            .render(
                "crop_note",
                &minijinja::context! { crop => view, note => "Hojas amarillas", today => "hoy" },
            )
            .unwrap_or_default();
        assert!(text.contains("Cultivo: Tomate"));
        assert!(text.contains("Vecinos: Albahaca, Lechuga (Romana)"));
        assert!(text.contains("Fecha de Plantación: fecha desconocida"));
        assert!(text.contains("\"La Finquina\""));
    }

    #[test]
    fn rotation_prompt_without_history() {
        let text = engine()
            .render(
                "rotation",
                &minijinja::context! {
                    bed => "Bancal 2",
                    crop_name => "Lechuga",
                    current_category => "HOJA",
                    history => Vec::<String>::new(),
                },
            )
            .unwrap_or_default();
        assert!(text.contains("Historial reciente: Sin registro anterior."));
        assert!(text.contains("en Asturias"));
    }

    #[test]
    fn spanish_dates() {
        assert_eq!(spanish_date(date()), "19 de octubre de 2026");
        assert_eq!(spanish_weekday_date(date()), "lunes, 19 de octubre de 2026");
        assert_eq!(short_date(date()), "19/10/2026");
    }

    #[test]
    fn overrides_replace_only_present_files() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let written = std::fs::write(
            dir.path().join("translate_to_english.j2"),
            "EN: {{ text }}",
        );
        assert!(written.is_ok());

        let engine = PromptEngine::with_overrides(&FarmProfile::default(), dir.path());
        assert!(engine.is_ok());
        let Ok(engine) = engine else { return };
        assert_eq!(
            engine
                .render("translate_to_english", &minijinja::context! { text => "Ajo" })
                .unwrap_or_default(),
            "EN: Ajo"
        );
        assert!(
            engine
                .render("translate_to_spanish", &minijinja::context! { text => "Garlic" })
                .unwrap_or_default()
                .contains("\"Garlic\"")
        );
    }
}
