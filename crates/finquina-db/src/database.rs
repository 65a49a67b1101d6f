//! The database handle shared by the whole service.
//!
//! [`Database::bootstrap`] never fails. When the connection string is
//! missing or malformed, or the server cannot be reached, the handle
//! comes up [`Database::Offline`] and every store degrades: reads return
//! neutral values (zero, empty, `None`) and writes return
//! [`DbError::Unavailable`]. Lookups that need no database keep working.
//!
//! The handle is built once at start-up and passed down explicitly.

use std::sync::Arc;

use sqlx::PgPool;

use crate::crop_log_store::CropLogStore;
use crate::crop_store::CropStore;
use crate::error::{ConnectionError, DbError};
use crate::expense_store::ExpenseStore;
use crate::maker_store::MakerStore;
use crate::postgres::{DatabaseSettings, PostgresPool};
use crate::resource_store::ResourceStore;
use crate::task_store::TaskStore;
use crate::tree_store::TreeStore;
use crate::weather_store::WeatherStore;

/// Connected or degraded database handle.
#[derive(Debug, Clone)]
pub enum Database {
    /// A live connection pool.
    Online(PostgresPool),
    /// No database; stores return neutral values.
    Offline {
        /// Why the database is unavailable.
        reason: Arc<str>,
    },
}

impl Database {
    /// Connect, migrate if configured, and fall back to offline mode on
    /// any failure.
    pub async fn bootstrap(settings: &DatabaseSettings) -> Self {
        match Self::connect(settings).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(error = %e, "Database unavailable, running in offline mode");
                Self::offline(e.to_string())
            }
        }
    }

    /// Connect and migrate, failing fast.
    ///
    /// # Errors
    ///
    /// Returns the [`ConnectionError`] from URL validation, connection,
    /// or migration.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, ConnectionError> {
        let pool = PostgresPool::connect(settings).await?;
        if settings.run_migrations {
            pool.run_migrations().await?;
        }
        Ok(Self::Online(pool))
    }

    /// An offline handle with the given reason.
    pub fn offline(reason: impl Into<String>) -> Self {
        Self::Offline {
            reason: Arc::from(reason.into()),
        }
    }

    /// Whether a live pool is available.
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online(_))
    }

    /// Why the database is offline, if it is.
    pub fn offline_reason(&self) -> Option<&str> {
        match self {
            Self::Online(_) => None,
            Self::Offline { reason } => Some(reason.as_ref()),
        }
    }

    /// The pool, if online. Reads use this to short-circuit to neutral
    /// values.
    pub const fn online(&self) -> Option<&PgPool> {
        match self {
            Self::Online(pool) => Some(pool.pool()),
            Self::Offline { .. } => None,
        }
    }

    /// The pool, or [`DbError::Unavailable`]. Writes use this.
    pub fn pool(&self) -> Result<&PgPool, DbError> {
        match self {
            Self::Online(pool) => Ok(pool.pool()),
            Self::Offline { reason } => Err(DbError::Unavailable(reason.to_string())),
        }
    }

    /// Close the pool, if any.
    pub async fn close(&self) {
        if let Self::Online(pool) = self {
            pool.close().await;
        }
    }

    /// Crop operations.
    pub const fn crops(&self) -> CropStore<'_> {
        CropStore::new(self)
    }

    /// Fruit tree operations.
    pub const fn trees(&self) -> TreeStore<'_> {
        TreeStore::new(self)
    }

    /// Task operations.
    pub const fn tasks(&self) -> TaskStore<'_> {
        TaskStore::new(self)
    }

    /// Journal entry operations.
    pub const fn crop_logs(&self) -> CropLogStore<'_> {
        CropLogStore::new(self)
    }

    /// Expense operations.
    pub const fn expenses(&self) -> ExpenseStore<'_> {
        ExpenseStore::new(self)
    }

    /// Inventory operations.
    pub const fn resources(&self) -> ResourceStore<'_> {
        ResourceStore::new(self)
    }

    /// Maker model operations.
    pub const fn maker_models(&self) -> MakerStore<'_> {
        MakerStore::new(self)
    }

    /// Weather history operations.
    pub const fn weather(&self) -> WeatherStore<'_> {
        WeatherStore::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_without_url_is_offline() {
        let db = Database::bootstrap(&DatabaseSettings::default()).await;
        assert!(!db.is_online());
        assert!(db.offline_reason().is_some_and(|r| r.contains("DATABASE_URL")));
    }

    #[tokio::test]
    async fn bootstrap_with_bad_password_is_offline() {
        let settings = DatabaseSettings::new("postgres://user:p@ss@localhost/finca");
        let db = Database::bootstrap(&settings).await;
        assert!(db.offline_reason().is_some_and(|r| r.contains("percent-encode")));
    }

    #[tokio::test]
    async fn connect_fails_fast() {
        let settings = DatabaseSettings::new("mysql://localhost/finca");
        assert!(matches!(
            Database::connect(&settings).await,
            Err(ConnectionError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn offline_writes_are_unavailable() {
        let db = Database::offline("test");
        assert!(db.online().is_none());
        assert!(db.pool().is_err_and(|e| e.is_unavailable()));
    }
}
