//! Data layer for La Finquina (`PostgreSQL`).
//!
//! The service talks to one `PostgreSQL` database through a [`Database`]
//! handle built once at start-up. The handle is either online (a pooled
//! connection) or offline (no database configured or reachable), and
//! every store honours that state.
//!
//! # Architecture
//!
//! ```text
//! DatabaseSettings --validate--> PostgresPool --migrate--> Database::Online
//!        |                            |
//!        +------- any failure --------+------------------> Database::Offline
//!
//! Database
//!     |-- CropStore       (crops, neighbours, bed history)
//!     |-- TreeStore       (fruit trees)
//!     |-- TaskStore       (tasks, urgency, completion)
//!     |-- CropLogStore    (journal entries)
//!     |-- ExpenseStore    (spending)
//!     |-- ResourceStore   (inventory)
//!     |-- MakerStore      (3D-printable parts)
//!     +-- WeatherStore    (daily weather history)
//! ```
//!
//! # Modules
//!
//! - [`database`] -- The online/offline handle and store accessors
//! - [`postgres`] -- Connection-string resolution, validation, and pool
//! - [`error`] -- [`ConnectionError`] and [`DbError`]
//! - one `*_store` module per table

pub mod crop_log_store;
pub mod crop_store;
pub mod database;
pub mod error;
pub mod expense_store;
pub mod maker_store;
pub mod postgres;
pub mod resource_store;
pub mod task_store;
pub mod tree_store;
pub mod weather_store;

// Re-export primary types for convenience.
pub use crop_log_store::{CropLogEntryRow, CropLogRow, CropLogStore};
pub use crop_store::{CropRow, CropStore};
pub use database::Database;
pub use error::{ConnectionError, DbError};
pub use expense_store::{DEFAULT_EXPENSE_CATEGORY, ExpenseRecord, ExpenseRow, ExpenseStore};
pub use maker_store::{MakerModelRow, MakerStore};
pub use postgres::{DatabaseSettings, PostgresPool, ResolvedUrl, URL_ALIASES, resolve_url, validate_url};
pub use resource_store::{ResourceRow, ResourceStore};
pub use task_store::{TaskRow, TaskStore};
pub use tree_store::{DEFAULT_TREE_HEALTH, TreeRow, TreeStore};
pub use weather_store::{WeatherLogRow, WeatherStore};
