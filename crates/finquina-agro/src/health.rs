//! Farm health score and tip extraction from journal analyses.

use serde::Serialize;

/// Marker preceding the agronomic tips inside a formatted analysis.
pub const TIPS_MARKER: &str = "Consejos Agronómicos: ";

/// Maximum tips taken from a single analysis for the dashboard.
pub const TIPS_PER_LOG: usize = 2;

/// Tips shorter than this (in characters) are dropped.
const MIN_TIP_CHARS: usize = 6;

/// Weight of each half of the score.
const HALF: f64 = 50.0;

/// Health points for one analysis text.
///
/// The first health label found wins: `Bueno` 50, `Regular` 25, `Malo`
/// 10. Anything else counts 30.
pub fn analysis_health_points(analysis: Option<&str>) -> u32 {
    match analysis {
        Some(text) if text.contains("Bueno") => 50,
        Some(text) if text.contains("Regular") => 25,
        Some(text) if text.contains("Malo") => 10,
        _ => 30,
    }
}

/// Inputs for the farm health score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthInputs {
    /// Tasks due in the window that are done.
    pub completed_tasks: i64,
    /// All tasks due in the window.
    pub total_tasks: i64,
}

/// Combined 0-100 score from task completion and recent log health.
///
/// Each half contributes up to 50 points. With no tasks the task half
/// is 50; with no logs the health half is 25.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn farm_health_score(inputs: HealthInputs, recent_analyses: &[Option<&str>]) -> u8 {
    let task_score = if inputs.total_tasks > 0 {
        (inputs.completed_tasks as f64 / inputs.total_tasks as f64) * HALF
    } else {
        HALF
    };

    let health_score = if recent_analyses.is_empty() {
        HALF / 2.0
    } else {
        let points: u32 = recent_analyses
            .iter()
            .map(|a| analysis_health_points(*a))
            .sum();
        f64::from(points) / (recent_analyses.len() as f64 * HALF) * HALF
    };

    (task_score + health_score).round().clamp(0.0, 100.0) as u8
}

/// The raw tips section of an analysis, up to the end of its line.
fn tips_section(analysis: &str) -> Option<&str> {
    let (_, after) = analysis.split_once(TIPS_MARKER)?;
    after.split('\n').next()
}

/// Agronomic tips in an analysis, in order, skipping fragments.
pub fn agronomic_tips(analysis: &str) -> Vec<String> {
    tips_section(analysis)
        .map(|section| {
            section
                .split(". ")
                .map(str::trim)
                .filter(|t| t.chars().count() >= MIN_TIP_CHARS)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// The first tip of an analysis, if any, used for notifications.
pub fn first_tip(analysis: &str) -> Option<String> {
    tips_section(analysis)?
        .split(". ")
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
}

/// Dashboard alert built from one journal analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgronomicAlert<K> {
    /// Owner of the analysis (usually a crop id).
    pub crop_id: K,
    /// Up to [`TIPS_PER_LOG`] tips.
    pub tips: Vec<String>,
}

/// Build dashboard alerts from `(owner, analysis)` pairs, newest first.
///
/// Analyses without usable tips are skipped; at most `limit` alerts are
/// returned.
pub fn agronomic_alerts<K: Copy>(
    analyses: &[(K, Option<&str>)],
    limit: usize,
) -> Vec<AgronomicAlert<K>> {
    analyses
        .iter()
        .filter_map(|(owner, analysis)| {
            let mut tips = agronomic_tips((*analysis)?);
            tips.truncate(TIPS_PER_LOG);
            (!tips.is_empty()).then_some(AgronomicAlert {
                crop_id: *owner,
                tips,
            })
        })
        .take(limit)
        .collect()
}
