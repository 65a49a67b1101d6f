//! External services used by La Finquina.
//!
//! - [`weather`]: Open-Meteo current conditions, alerts, and daily history
//! - [`plants`]: Perenual species search and details
//! - [`blob`]: local filesystem store for uploaded images

pub mod blob;
pub mod error;
pub mod plants;
pub mod weather;

pub use blob::{DEFAULT_PUBLIC_BASE, LocalBlobStore, StoredBlob};
pub use error::IntegrationError;
pub use plants::{DEFAULT_PERENUAL_URL, Hardiness, PlantClient, PlantDetails, PlantImage, PlantSummary};
pub use weather::{Coordinates, CurrentWeather, DEFAULT_WEATHER_URL, WeatherClient};
