//! Farm settings loaded from an optional YAML file.
//!
//! Secrets and service endpoints come from the environment (see the
//! `from_lookup` constructors of each client). This file holds what
//! describes the farm itself: its name and region, where it is, the
//! rain thresholds for irrigation advice, and how long rendered views
//! may be cached.
//!
//! ```yaml
//! farm:
//!   name: La Finquina
//!   region: Asturias
//!   latitude: 43.43519
//!   longitude: -5.68478
//! irrigation:
//!   crops_wet_mm: 5.0
//!   trees_ok_mm: 3.0
//! cache:
//!   ttl_secs: 60
//! ```

use std::path::Path;
use std::time::Duration;

use finquina_agro::IrrigationThresholds;
use finquina_ai::FarmProfile;
use finquina_integrations::Coordinates;
use serde::Deserialize;

/// Environment variable naming the YAML file.
pub const CONFIG_PATH_VAR: &str = "FINQUINA_CONFIG";

/// Errors that can occur when loading the farm configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but makes no sense.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level farm configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FarmConfig {
    /// Name and location.
    #[serde(default)]
    pub farm: FarmSection,

    /// Rain thresholds for irrigation advice.
    #[serde(default)]
    pub irrigation: IrrigationThresholds,

    /// Render cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Name and location of the farm.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FarmSection {
    /// Display name used in prompts.
    #[serde(default = "default_name")]
    pub name: String,

    /// Region used in prompts.
    #[serde(default = "default_region")]
    pub region: String,

    /// Latitude for weather lookups.
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Longitude for weather lookups.
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

impl Default for FarmSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            region: default_region(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

/// Render cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached view stays fresh without a revalidation.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    /// The TTL as a [`Duration`].
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl FarmConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `FINQUINA_CONFIG`, or use defaults.
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                tracing::info!(path = %path.trim(), "Loading farm config");
                Self::from_file(Path::new(path.trim()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Load using the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|name| std::env::var(name).ok())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.farm.latitude) {
            return Err(ConfigError::Invalid {
                field: "farm.latitude",
                reason: format!("{} is outside [-90, 90]", self.farm.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.farm.longitude) {
            return Err(ConfigError::Invalid {
                field: "farm.longitude",
                reason: format!("{} is outside [-180, 180]", self.farm.longitude),
            });
        }
        if self.irrigation.crops_wet_mm < 0.0 || self.irrigation.trees_ok_mm < 0.0 {
            return Err(ConfigError::Invalid {
                field: "irrigation",
                reason: "thresholds must not be negative".to_owned(),
            });
        }
        Ok(())
    }

    /// Where to ask for the weather.
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.farm.latitude,
            longitude: self.farm.longitude,
        }
    }

    /// Name and region for prompt templates.
    pub fn profile(&self) -> FarmProfile {
        FarmProfile {
            name: self.farm.name.clone(),
            region: self.farm.region.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_name() -> String {
    "La Finquina".to_owned()
}

fn default_region() -> String {
    "Asturias".to_owned()
}

const fn default_latitude() -> f64 {
    43.435_19
}

const fn default_longitude() -> f64 {
    -5.684_78
}

const fn default_ttl_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = FarmConfig::parse("{}").unwrap_or_default();
        assert_eq!(config.farm.name, "La Finquina");
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.coordinates(), Coordinates::default());
    }

    #[test]
    fn partial_yaml_overrides() {
        let yaml = "farm:\n  name: Casa Pepe\n  latitude: 42.0\nirrigation:\n  crops_wet_mm: 8.0\n";
        let config = FarmConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.farm.name, "Casa Pepe");
        assert_eq!(config.farm.region, "Asturias");
        assert!((config.farm.latitude - 42.0).abs() < f64::EPSILON);
        assert!((config.irrigation.crops_wet_mm - 8.0).abs() < f64::EPSILON);
        assert!((config.irrigation.trees_ok_mm - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.profile().name, "Casa Pepe");
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let result = FarmConfig::parse("farm:\n  latitude: 123.0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "farm.latitude",
                ..
            })
        ));
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(matches!(
            FarmConfig::parse("farm: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn load_without_path_is_default() {
        assert!(FarmConfig::load(|_| None).is_ok_and(|c| c == FarmConfig::default()));
    }

    #[test]
    fn load_reads_named_file() {
        let Ok(dir) = tempfile::tempdir() else { return };
        let path = dir.path().join("finca.yaml");
        if std::fs::write(&path, "cache:\n  ttl_secs: 5\n").is_err() {
            return;
        }
        let path_str = path.to_string_lossy().into_owned();
        let config = FarmConfig::load(|name| (name == CONFIG_PATH_VAR).then(|| path_str.clone()));
        assert!(config.is_ok_and(|c| c.cache.ttl_secs == 5));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let config = FarmConfig::load(|_| Some("/nonexistent/finca.yaml".to_owned()));
        assert!(matches!(config, Err(ConfigError::Io { .. })));
    }
}
