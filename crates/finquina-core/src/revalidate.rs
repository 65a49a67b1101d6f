//! Route revalidation bus.
//!
//! Every write publishes the view paths it affects. The server's render
//! cache and any connected `WebSocket` clients subscribe and drop their
//! copies of those paths. A subscriber that falls behind by more than
//! [`CHANNEL_CAPACITY`] events skips ahead to the newest one.

use chrono::{DateTime, Utc};
use finquina_types::CropId;
use serde::Serialize;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel.
pub const CHANNEL_CAPACITY: usize = 256;

/// Dashboard.
pub const HOME: &str = "/";
/// Crop list.
pub const CROPS: &str = "/crops";
/// Farm map.
pub const MAP: &str = "/map";
/// Task list.
pub const TASKS: &str = "/tasks";
/// Expense list.
pub const EXPENSES: &str = "/expenses";
/// Inventory.
pub const INVENTORY: &str = "/inventory";
/// Spending analytics.
pub const ANALYTICS: &str = "/analytics";
/// Photo journal.
pub const JOURNAL: &str = "/journal";
/// Maker models.
pub const MAKER: &str = "/maker";
/// Harvest calendar.
pub const CALENDAR: &str = "/calendar";

/// Detail view of one crop.
pub fn crop_path(id: CropId) -> String {
    format!("/crops/{id}")
}

/// A set of paths invalidated by one write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevalidationEvent {
    /// Affected view paths.
    pub paths: Vec<String>,
    /// When the write happened.
    pub at: DateTime<Utc>,
}

impl RevalidationEvent {
    /// Whether this event touches `path`.
    pub fn affects(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

/// Publisher side of the bus. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<RevalidationEvent>,
}

impl Revalidator {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<RevalidationEvent> {
        self.tx.subscribe()
    }

    /// Publish the given paths.
    ///
    /// Returns how many subscribers received the event; zero when nobody
    /// is listening.
    pub fn revalidate<S: AsRef<str>>(&self, paths: &[S]) -> usize {
        let event = RevalidationEvent {
            paths: paths.iter().map(|p| p.as_ref().to_owned()).collect(),
            at: Utc::now(),
        };
        tracing::debug!(paths = ?event.paths, "Revalidating");
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_paths() {
        let bus = Revalidator::new();
        let mut rx = bus.subscribe();
        assert_eq!(bus.revalidate(&[CROPS, HOME]), 1);

        let event = rx.recv().await;
        assert!(event.is_ok_and(|e| e.affects(CROPS) && e.affects(HOME) && !e.affects(TASKS)));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = Revalidator::default();
        assert_eq!(bus.revalidate(&[crop_path(CropId(3))]), 0);
        assert_eq!(crop_path(CropId(3)), "/crops/3");
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_ahead() {
        let bus = Revalidator::new();
        let mut rx = bus.subscribe();
        for _ in 0..=CHANNEL_CAPACITY {
            bus.revalidate(&[HOME]);
        }
        bus.revalidate(&[JOURNAL]);
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert!(last.is_some_and(|e| e.affects(JOURNAL)));
    }
}
