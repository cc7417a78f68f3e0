//! Add, refresh and remove tracked cities: validation, provider lookup and
//! persistence in the order the app performs them.

use std::sync::Arc;

use crate::{
    format::capitalize_first,
    model::{City, HistoricalEntry, WeatherSnapshot},
    provider::{ProviderError, WeatherProvider},
    store::{StorageWriteError, WeatherStore},
    validation::validate_city_name,
};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Input rejected before any lookup or write.
    #[error("{0}")]
    Invalid(String),

    #[error("'{0}' is not a saved city. Add it first with `cityweather add`.")]
    NotSaved(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StorageWriteError),
}

#[derive(Debug, Clone)]
pub struct AddedCity {
    pub city: City,
    pub cities: Vec<City>,
    pub snapshot: WeatherSnapshot,
}

#[derive(Debug, Clone)]
pub struct Refreshed {
    pub snapshot: WeatherSnapshot,
    pub history: Vec<HistoricalEntry>,
}

/// Each call is independent; callers that need "check, then add" to be
/// atomic must not issue overlapping calls for the same city.
#[derive(Debug)]
pub struct CityTracker {
    store: Arc<WeatherStore>,
    provider: Box<dyn WeatherProvider>,
}

impl CityTracker {
    pub fn new(store: Arc<WeatherStore>, provider: Box<dyn WeatherProvider>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &WeatherStore {
        &self.store
    }

    /// Validate `input`, look it up, and save the city under the name and
    /// country the provider reports. The snapshot becomes the first history
    /// entry for that name.
    pub async fn add_city(&self, input: &str) -> Result<AddedCity, TrackerError> {
        let validation = validate_city_name(input);
        if !validation.is_valid {
            let message = validation
                .error
                .unwrap_or_else(|| "Invalid city name".to_string());
            return Err(TrackerError::Invalid(message));
        }

        let query = capitalize_first(input.trim());
        let snapshot = self.provider.current_weather(&query).await?;

        let city = snapshot.city();
        let cities = self.store.save_city(city.clone()).await?;
        self.store
            .save_weather_data(&city.name, snapshot.clone())
            .await?;

        tracing::info!(city = %city.name, country = %city.country, "city added");
        Ok(AddedCity {
            city,
            cities,
            snapshot,
        })
    }

    /// Fetch current conditions for a saved city and append them to its
    /// history. `city_name` must match a saved city's name exactly.
    pub async fn refresh_city(&self, city_name: &str) -> Result<Refreshed, TrackerError> {
        let saved = self.store.get_cities().await;
        if !saved.iter().any(|c| c.name == city_name) {
            return Err(TrackerError::NotSaved(city_name.to_string()));
        }

        let snapshot = self.provider.current_weather(city_name).await?;
        let history = self
            .store
            .save_weather_data(city_name, snapshot.clone())
            .await?;

        Ok(Refreshed { snapshot, history })
    }

    pub async fn remove_city(&self, city_name: &str) -> Result<Vec<City>, TrackerError> {
        Ok(self.store.remove_city(city_name).await?)
    }

    pub async fn cities(&self) -> Vec<City> {
        self.store.get_cities().await
    }

    pub async fn history(&self, city_name: &str) -> Vec<HistoricalEntry> {
        self.store.get_historical_data(city_name).await
    }
}
