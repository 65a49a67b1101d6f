//! The notification bell: low stock, urgent tasks, advisor tips and
//! weather alerts, in that order.

use finquina_agro::{AlertKind, WeatherAlert, first_tip};
use finquina_types::{CropLogEntry, Resource, Task};
use serde::Serialize;

use crate::farm::{Farm, read_or_default};

/// Urgent tasks listed.
const URGENT_NOTIFICATIONS: i64 = 3;
/// Journal entries scanned for tips.
const TIP_LOGS: i64 = 10;

/// How loud a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Needs attention soon.
    Warning,
    /// For information.
    Info,
    /// Act now.
    Alert,
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationCategory {
    /// Low stock.
    Inventory,
    /// Urgent tasks.
    Tasks,
    /// Advisor tips.
    Agronomy,
    /// Forecast alerts.
    Weather,
}

/// One entry in the notification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Stable id, unique within the list.
    pub id: String,
    /// Level.
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Source.
    pub category: NotificationCategory,
}

impl Notification {
    /// Low-stock warning for a resource.
    pub fn low_stock(resource: &Resource) -> Self {
        Self {
            id: format!("stock-{}", resource.id),
            level: NotificationLevel::Warning,
            title: "Almacén".to_owned(),
            message: format!(
                "Quedan {} {} de {}",
                resource.quantity.normalize(),
                resource.unit,
                resource.name
            ),
            category: NotificationCategory::Inventory,
        }
    }

    /// Reminder for a pending high-priority task.
    pub fn urgent_task(task: &Task) -> Self {
        Self {
            id: format!("task-{}", task.id),
            level: NotificationLevel::Info,
            title: "Urgente".to_owned(),
            message: task.title.clone(),
            category: NotificationCategory::Tasks,
        }
    }

    /// The first advisor tip of a journal entry, if it has one.
    pub fn agronomy(entry: &CropLogEntry) -> Option<Self> {
        let tip = first_tip(entry.log.ai_analysis.as_deref()?)?;
        Some(Self {
            id: format!("agro-{}", entry.log.id),
            level: NotificationLevel::Alert,
            title: format!("IA: {}", entry.crop_name),
            message: tip,
            category: NotificationCategory::Agronomy,
        })
    }

    /// A forecast alert.
    pub fn weather(alert: &WeatherAlert) -> Self {
        let kind = match alert.kind {
            AlertKind::Frost => "frost",
            AlertKind::Rain => "rain",
        };
        Self {
            id: format!("weather-{kind}"),
            level: NotificationLevel::Alert,
            title: "Clima".to_owned(),
            message: alert.message.to_owned(),
            category: NotificationCategory::Weather,
        }
    }
}

impl Farm {
    /// Everything worth a badge right now.
    pub async fn notifications(&self) -> Vec<Notification> {
        let resources = self.db.resources();
        let tasks = self.db.tasks();
        let logs = self.db.crop_logs();
        let (low_stock, urgent, recent, weather) = tokio::join!(
            resources.low_stock(),
            tasks.high_priority_pending(URGENT_NOTIFICATIONS),
            logs.recent(TIP_LOGS),
            self.current_weather(),
        );

        let mut notifications: Vec<Notification> = read_or_default("notify_stock", low_stock)
            .iter()
            .map(Notification::low_stock)
            .collect();
        notifications.extend(
            read_or_default("notify_tasks", urgent)
                .iter()
                .map(Notification::urgent_task),
        );
        notifications.extend(
            read_or_default("notify_tips", recent)
                .iter()
                .filter_map(Notification::agronomy),
        );
        if let Some(weather) = weather {
            notifications.extend(weather.alerts.iter().map(Notification::weather));
        }
        notifications
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use finquina_types::{
        CropId, CropLog, CropLogId, ResourceCategory, ResourceId, TaskCategory, TaskId,
        TaskPriority, TaskStatus,
    };
    use rust_decimal::Decimal;

    use crate::testing::offline_farm;

    use super::*;

    fn entry(analysis: Option<&str>) -> CropLogEntry {
        CropLogEntry {
            log: CropLog {
                id: CropLogId(12),
                crop_id: CropId(3),
                date: Utc::now(),
                created_at: Utc::now(),
                image_url: None,
                note: None,
                ai_analysis: analysis.map(ToOwned::to_owned),
            },
            crop_name: "Tomate".to_owned(),
        }
    }

    #[test]
    fn stock_message_drops_trailing_zeros() {
        let resource = Resource {
            id: ResourceId(4),
            name: "Semillas de lechuga".to_owned(),
            category: ResourceCategory::Seeds,
            quantity: Decimal::new(200, 2),
            unit: "sobres".to_owned(),
            min_stock: Decimal::new(3, 0),
            updated_at: Utc::now(),
        };
        let n = Notification::low_stock(&resource);
        assert_eq!(n.id, "stock-4");
        assert_eq!(n.message, "Quedan 2 sobres de Semillas de lechuga");
        assert_eq!(n.level, NotificationLevel::Warning);
    }

    #[test]
    fn urgent_task_uses_title() {
        let task = Task {
            id: TaskId(8),
            title: "Sulfatar viñedo".to_owned(),
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            periodicity: None,
            category: TaskCategory::Garden,
            priority: TaskPriority::High,
            crop_id: None,
        };
        let n = Notification::urgent_task(&task);
        assert_eq!(n.id, "task-8");
        assert_eq!(n.title, "Urgente");
        assert_eq!(n.message, "Sulfatar viñedo");
        assert_eq!(n.level, NotificationLevel::Info);
    }

    #[test]
    fn agronomy_takes_first_tip() {
        let text = "Salud: Regular\n💡 Consejos Agronómicos: Aclarar hojas bajas. Regar por la mañana\nConsejo: vigilar";
        let n = Notification::agronomy(&entry(Some(text)));
        assert!(n.is_some_and(|n| n.id == "agro-12"
            && n.title == "IA: Tomate"
            && n.message == "Aclarar hojas bajas"
            && n.level == NotificationLevel::Alert));
        assert!(Notification::agronomy(&entry(Some("Sin consejos"))).is_none());
        assert!(Notification::agronomy(&entry(None)).is_none());
    }

    #[test]
    fn weather_id_names_the_kind() {
        let n = Notification::weather(&WeatherAlert {
            kind: AlertKind::Frost,
            message: "Riesgo de helada detectado",
        });
        assert_eq!(n.id, "weather-frost");
        assert_eq!(n.category, NotificationCategory::Weather);
        let json = serde_json::to_value(&n).unwrap_or_default();
        assert_eq!(json.get("type").and_then(serde_json::Value::as_str), Some("alert"));
    }

    #[tokio::test]
    async fn offline_farm_has_no_notifications() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(farm.notifications().await.is_empty());
    }
}
