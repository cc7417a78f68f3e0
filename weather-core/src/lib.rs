//! Core library for the `cityweather` app.
//!
//! This crate defines:
//! - Persistence of saved cities and bounded per-city weather history
//! - Pluggable storage backends (in-memory, one JSON file per key)
//! - City-name validation, unit conversion and display formatting
//! - Abstraction over weather providers
//! - Configuration & credentials handling
//!
//! It is used by `city-weather-cli`, but can also be reused by other front ends.

pub mod backend;
pub mod config;
pub mod convert;
pub mod format;
pub mod model;
pub mod provider;
pub mod store;
pub mod tracker;
pub mod validation;

pub use backend::{BackendError, FileBackend, MemoryBackend, StorageBackend};
pub use config::{Config, ProviderConfig};
pub use convert::kelvin_to_celsius;
pub use format::{
    DateInput, FormatError, capitalize_first, capitalize_words, format_date,
    format_historical_date,
};
pub use model::{City, HistoricalEntry, WeatherSnapshot};
pub use provider::{ProviderError, ProviderId, WeatherProvider, openweather::icon_url};
pub use store::{StorageWriteError, StoreOptions, WeatherStore};
pub use tracker::{CityTracker, TrackerError};
pub use validation::{ValidationResult, validate_city_name};
