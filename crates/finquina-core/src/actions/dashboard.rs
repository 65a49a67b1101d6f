//! The home dashboard.
//!
//! Lunar info and weather do not depend on the database and are always
//! filled in. Everything else comes from one fan-out of store reads;
//! if the database is offline or a read fails, those fields keep their
//! neutral values and the advice line says why.

use chrono::{DateTime, Duration, Utc};
use finquina_agro::{
    AgronomicAlert, HealthInputs, IrrigationAdvice, LunarInfo, agronomic_alerts,
    farm_health_score, irrigation_advice, lunar_info, start_of_month,
};
use finquina_ai::{AiError, DailyContext};
use finquina_db::DbError;
use finquina_integrations::CurrentWeather;
use finquina_types::{CropId, CropLogEntry, CropStatus, Resource, TaskStatus};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::actions::weather::precipitation;
use crate::farm::Farm;

/// Advice shown before anything has been computed.
pub const ADVICE_PENDING: &str = "Buscando consejos...";
/// Advice when no model key is configured.
pub const ADVICE_OFFLINE: &str = "El asesor está offline ahora mismo.";
/// Advice when the model answered with nothing.
pub const ADVICE_EMPTY: &str = "Sin consejos hoy.";
/// Advice when every model hit its quota.
pub const ADVICE_QUOTA: &str =
    "La IA está descansando un momento (límite de cuota gratuito). Prueba en un minuto. ☕";

/// Recent journal entries scored for farm health.
const HEALTH_LOGS: i64 = 10;
/// Window for the task-completion half of the health score.
const HEALTH_WINDOW_DAYS: i64 = 30;
/// Active crops and pending tasks passed to the advisor.
const ADVICE_SAMPLE: i64 = 5;
/// Agronomic alerts shown.
const AGRONOMIC_ALERT_LIMIT: usize = 3;
/// Characters of a database error shown in the advice line.
const DB_ERROR_CHARS: usize = 50;
/// Characters of a model error shown in the advice line.
const AI_ERROR_CHARS: usize = 500;

/// A resource at or below its alert level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceAlert {
    /// Item name.
    pub name: String,
    /// Units left.
    pub quantity: Decimal,
    /// Unit label.
    pub unit: String,
}

impl From<Resource> for ResourceAlert {
    fn from(resource: Resource) -> Self {
        Self {
            name: resource.name,
            quantity: resource.quantity,
            unit: resource.unit,
        }
    }
}

/// Everything the home page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Crops currently planted.
    pub active_crops: i64,
    /// Tasks not yet done.
    pub pending_tasks: i64,
    /// Pending high-priority tasks.
    pub urgent_tasks: i64,
    /// Spending since the first of the month.
    pub monthly_spending: Decimal,
    /// The advisor's line for today, or a fallback.
    pub ai_advice: String,
    /// 0-100 score from task completion and recent analyses.
    pub farm_health_score: u8,
    /// Moon phase and planting advice.
    pub lunar_info: LunarInfo,
    /// Live conditions, if the provider answered.
    pub weather: Option<CurrentWeather>,
    /// Watering verdicts from stored rainfall.
    pub irrigation: IrrigationAdvice,
    /// Low-stock resources.
    pub resource_alerts: Vec<ResourceAlert>,
    /// Tips from recent analyses.
    pub agronomic_alerts: Vec<AgronomicAlert<CropId>>,
}

impl DashboardStats {
    /// Neutral stats around the always-available parts.
    fn neutral(
        lunar_info: LunarInfo,
        weather: Option<CurrentWeather>,
        irrigation: IrrigationAdvice,
    ) -> Self {
        Self {
            active_crops: 0,
            pending_tasks: 0,
            urgent_tasks: 0,
            monthly_spending: Decimal::ZERO,
            ai_advice: ADVICE_PENDING.to_owned(),
            farm_health_score: 0,
            lunar_info,
            weather,
            irrigation,
            resource_alerts: Vec::new(),
            agronomic_alerts: Vec::new(),
        }
    }
}

/// Store reads behind the dashboard.
struct Snapshot {
    active_crops: i64,
    pending_tasks: i64,
    urgent_tasks: i64,
    monthly_spending: Decimal,
    completion: (i64, i64),
    recent_logs: Vec<CropLogEntry>,
    low_stock: Vec<Resource>,
    crop_sample: Vec<String>,
    task_sample: Vec<String>,
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Advice line when the database could not be read.
pub fn database_error_advice(message: &str) -> String {
    format!(
        "Error BD: {}... (El clima y la luna siguen operativos)",
        truncate_chars(message, DB_ERROR_CHARS)
    )
}

/// Advice line for a failed model call.
pub fn advisor_error_advice(err: &AiError) -> String {
    if err.is_quota() {
        ADVICE_QUOTA.to_owned()
    } else if matches!(err, AiError::NoProviders) {
        ADVICE_OFFLINE.to_owned()
    } else {
        format!(
            "IA en mantenimiento. Error: {} 🌱",
            truncate_chars(&err.to_string(), AI_ERROR_CHARS)
        )
    }
}

impl Farm {
    async fn dashboard_snapshot(&self, now: DateTime<Utc>) -> Result<Snapshot, DbError> {
        let crops = self.db.crops();
        let tasks = self.db.tasks();
        let logs = self.db.crop_logs();
        let expenses = self.db.expenses();
        let resources = self.db.resources();
        let window_start = now
            .checked_sub_signed(Duration::days(HEALTH_WINDOW_DAYS))
            .unwrap_or(now);

        let (
            active_crops,
            pending_tasks,
            urgent_tasks,
            monthly_spending,
            completion,
            recent_logs,
            low_stock,
            crop_sample,
            task_sample,
        ) = tokio::try_join!(
            crops.count_by_status(CropStatus::Planted),
            tasks.count_by_status(TaskStatus::Pending),
            tasks.count_high_priority_pending(),
            expenses.total_since(start_of_month(now)),
            tasks.completion_since(window_start),
            logs.recent(HEALTH_LOGS),
            resources.low_stock(),
            crops.list_by_status(CropStatus::Planted, Some(ADVICE_SAMPLE)),
            tasks.pending(ADVICE_SAMPLE),
        )?;

        Ok(Snapshot {
            active_crops,
            pending_tasks,
            urgent_tasks,
            monthly_spending,
            completion,
            recent_logs,
            low_stock,
            crop_sample: crop_sample.into_iter().map(|c| c.name).collect(),
            task_sample: task_sample.into_iter().map(|t| t.title).collect(),
        })
    }

    async fn daily_advice(&self, snapshot: &Snapshot, weather: Option<&CurrentWeather>) -> String {
        let context = DailyContext {
            today: Utc::now().date_naive(),
            temperature: weather.map(|w| w.temperature),
            humidity: weather.map(|w| w.humidity),
            pending_tasks: snapshot.task_sample.clone(),
            active_crops: snapshot.crop_sample.clone(),
            monthly_spending: snapshot.monthly_spending,
        };
        match self.advisor.daily_advice(&context).await {
            Ok(advice) if advice.trim().is_empty() => ADVICE_EMPTY.to_owned(),
            Ok(advice) => advice,
            Err(e) => {
                tracing::warn!(error = %e, "Daily advice failed");
                advisor_error_advice(&e)
            }
        }
    }

    /// Build the dashboard.
    pub async fn dashboard_stats(&self) -> DashboardStats {
        let now = Utc::now();
        let lunar = lunar_info(now);
        let (weather, rainfall) = tokio::join!(self.current_weather(), self.recent_rainfall());
        let irrigation = irrigation_advice(&precipitation(&rainfall), &self.config.irrigation);
        let mut stats = DashboardStats::neutral(lunar, weather, irrigation);

        if let Some(reason) = self.db.offline_reason() {
            stats.ai_advice = database_error_advice(reason);
            return stats;
        }
        let snapshot = match self.dashboard_snapshot(now).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Dashboard reads failed");
                stats.ai_advice = database_error_advice(&e.to_string());
                return stats;
            }
        };

        let analyses: Vec<Option<&str>> = snapshot
            .recent_logs
            .iter()
            .map(|e| e.log.ai_analysis.as_deref())
            .collect();
        let (completed_tasks, total_tasks) = snapshot.completion;
        let farm_health = farm_health_score(
            HealthInputs {
                completed_tasks,
                total_tasks,
            },
            &analyses,
        );
        let pairs: Vec<(CropId, Option<&str>)> = snapshot
            .recent_logs
            .iter()
            .map(|e| (e.log.crop_id, e.log.ai_analysis.as_deref()))
            .collect();
        let tips = agronomic_alerts(&pairs, AGRONOMIC_ALERT_LIMIT);

        stats.ai_advice = self.daily_advice(&snapshot, stats.weather.as_ref()).await;
        stats.active_crops = snapshot.active_crops;
        stats.pending_tasks = snapshot.pending_tasks;
        stats.urgent_tasks = snapshot.urgent_tasks;
        stats.monthly_spending = snapshot.monthly_spending;
        stats.farm_health_score = farm_health;
        stats.agronomic_alerts = tips;
        stats.resource_alerts = snapshot.low_stock.into_iter().map(ResourceAlert::from).collect();
        stats
    }
}
