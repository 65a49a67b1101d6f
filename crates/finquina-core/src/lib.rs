//! The La Finquina service core.
//!
//! Ties the data layer, the advisor, and the outside services together
//! behind one [`Farm`] handle whose methods are the operations the HTTP
//! server exposes.
//!
//! # Modules
//!
//! - [`config`] -- Farm settings from an optional YAML file.
//! - [`farm`] -- The [`Farm`] handle and degradation helpers.
//! - [`actions`] -- Every operation, grouped by area.
//! - [`revalidate`] -- Broadcast of paths whose views went stale.
//! - [`error`] -- [`ActionError`] and [`SetupError`].

pub mod actions;
pub mod config;
pub mod error;
pub mod farm;
pub mod revalidate;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root.
pub use actions::calendar::CalendarEntry;
pub use actions::crops::CropDetail;
pub use actions::dashboard::{DashboardStats, ResourceAlert};
pub use actions::journal::{JournalOutcome, ProgressOutcome};
pub use actions::notifications::{Notification, NotificationCategory, NotificationLevel};
pub use actions::rotation::{RotationInfo, rotation_info};
pub use actions::search::SearchResults;
pub use config::{CONFIG_PATH_VAR, CacheConfig, ConfigError, FarmConfig, FarmSection};
pub use error::{ActionError, SetupError};
pub use farm::Farm;
pub use revalidate::{RevalidationEvent, Revalidator};
