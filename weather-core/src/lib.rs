//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The resolution pipeline: city name → coordinates → current weather →
//!   daily forecast samples
//! - The deduplicated search history and its durable medium
//! - Configuration & credentials handling
//! - Upstream capability traits with an OpenWeather-compatible HTTP client
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod service;

pub use config::Config;
pub use error::{HistoryError, ResolveError, ServiceError};
pub use history::{HistoryMedium, HistoryStore, JsonFileMedium};
pub use model::{Coordinates, ForecastSeries, HistoryEntry, WeatherSample};
pub use provider::{Geocoder, OpenWeatherClient, WeatherSource};
pub use resolver::Resolver;
pub use service::WeatherService;
