//! The farm context every action runs against.
//!
//! A [`Farm`] bundles the database handle, the advisor, the weather and
//! plant clients, the blob store, the revalidation bus and the farm
//! settings. It is built once at start-up and shared behind an `Arc`.

use std::time::Duration;

use finquina_ai::{Advisor, AiConfig};
use finquina_db::{Database, DbError};
use finquina_integrations::{LocalBlobStore, PlantClient, WeatherClient};
use validator::Validate;

use crate::config::FarmConfig;
use crate::error::{ActionError, SetupError};
use crate::revalidate::Revalidator;

/// Timeout for weather and plant catalogue requests.
const INTEGRATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared state for all farm actions.
#[derive(Debug)]
pub struct Farm {
    pub(crate) db: Database,
    pub(crate) advisor: Advisor,
    pub(crate) weather: WeatherClient,
    pub(crate) plants: PlantClient,
    pub(crate) blobs: LocalBlobStore,
    pub(crate) revalidator: Revalidator,
    pub(crate) config: FarmConfig,
}

impl Farm {
    /// Assemble a farm from ready-made parts.
    pub fn new(
        db: Database,
        advisor: Advisor,
        weather: WeatherClient,
        plants: PlantClient,
        blobs: LocalBlobStore,
        config: FarmConfig,
    ) -> Self {
        Self {
            db,
            advisor,
            weather,
            plants,
            blobs,
            revalidator: Revalidator::new(),
            config,
        }
    }

    /// Build every client from environment-style settings.
    ///
    /// Missing API keys are not errors: the advisor and plant search
    /// simply report themselves unconfigured.
    pub fn from_lookup<F>(
        db: Database,
        config: FarmConfig,
        blobs: LocalBlobStore,
        lookup: F,
    ) -> Result<Self, SetupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ai_config = AiConfig::from_lookup(&lookup)?;
        let advisor = Advisor::new(&ai_config, &config.profile())?;
        if !advisor.is_configured() {
            tracing::warn!("No GOOGLE_API_KEY configured; AI features will use fallbacks");
        }

        let http = reqwest::Client::builder()
            .timeout(INTEGRATION_TIMEOUT)
            .build()
            .unwrap_or_default();
        let weather = WeatherClient::from_lookup(http.clone(), &lookup);
        let plants = PlantClient::from_lookup(http, &lookup);

        Ok(Self::new(db, advisor, weather, plants, blobs, config))
    }

    /// The database handle.
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// The blob store.
    pub const fn blobs(&self) -> &LocalBlobStore {
        &self.blobs
    }

    /// The revalidation bus.
    pub const fn revalidator(&self) -> &Revalidator {
        &self.revalidator
    }

    /// Farm settings.
    pub const fn config(&self) -> &FarmConfig {
        &self.config
    }

    /// Whether the advisor has any API key.
    pub fn ai_configured(&self) -> bool {
        self.advisor.is_configured()
    }

    /// Whether plant search has an API key.
    pub const fn plants_configured(&self) -> bool {
        self.plants.is_configured()
    }

    /// Publish revalidation for `paths`.
    pub(crate) fn revalidate<S: AsRef<str>>(&self, paths: &[S]) {
        self.revalidator.revalidate(paths);
    }
}

// ---------------------------------------------------------------------------
// Degradation helpers
// ---------------------------------------------------------------------------

/// Unwrap a read, logging failures and falling back to the default.
pub(crate) fn read_or_default<T: Default>(op: &'static str, result: Result<T, DbError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(op, error = %e, "Read failed, returning empty result");
        T::default()
    })
}

/// Unwrap a write, logging failures. `None` means nothing was stored.
pub(crate) fn written<T>(op: &'static str, result: Result<T, DbError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_unavailable() => {
            tracing::warn!(op, "Database offline, write skipped");
            None
        }
        Err(e) => {
            tracing::error!(op, error = %e, "Write failed");
            None
        }
    }
}

/// Run `validator` checks and convert the first failure.
pub(crate) fn validate<T: Validate>(input: &T) -> Result<(), ActionError> {
    input
        .validate()
        .map_err(|errors| ActionError::from_validation(&errors))
}
