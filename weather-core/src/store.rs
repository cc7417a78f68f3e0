//! Durable saved-city list and per-city weather history.
//!
//! Both collections live under one fixed key each and every operation is a
//! full read-modify-write of its collection. Operations on the same
//! collection are queued behind a FIFO mutex, so concurrent callers see
//! them applied one at a time in arrival order.
//!
//! Reads are fail-safe: a missing, unreadable or corrupt record is treated as
//! an empty collection. Write failures are always returned to the caller.
//!
//! All cities' histories share one record, a JSON object keyed by city name.
//! Only the list for the city being read or written is decoded; the other
//! cities' lists are carried through untouched, so one malformed list cannot
//! hide or destroy the rest. Every history write still rewrites the whole
//! record.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    backend::{BackendError, StorageBackend},
    model::{City, HistoricalEntry, WeatherSnapshot},
};

pub const CITIES_KEY: &str = "saved_cities";
pub const HISTORY_KEY: &str = "weather_history";
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 50;

/// City name -> that city's entries (newest first), still undecoded.
type RawHistory = BTreeMap<String, Value>;

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Per-city history cap. Values below 1 are treated as 1.
    pub max_history_entries: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_history_entries: DEFAULT_MAX_HISTORY_ENTRIES,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteCause {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("could not serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The existing record could not be decoded, so it was left as is.
    #[error("stored record is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// A write round-trip to the backend failed, or the record it would
/// overwrite could not be decoded. Nothing was persisted.
#[derive(Debug, thiserror::Error)]
#[error("{action}: {source}")]
pub struct StorageWriteError {
    pub action: &'static str,
    pub key: &'static str,
    #[source]
    pub source: WriteCause,
}

#[derive(Debug)]
pub struct WeatherStore {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    options: StoreOptions,
    cities_queue: Mutex<()>,
    history_queue: Mutex<()>,
}

impl WeatherStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: Arc<dyn StorageBackend>, options: StoreOptions) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            options,
            cities_queue: Mutex::new(()),
            history_queue: Mutex::new(()),
        }
    }

    /// Replace the clock used to stamp new history entries.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// All saved cities, or an empty list if none were saved or the record
    /// cannot be read.
    pub async fn get_cities(&self) -> Vec<City> {
        let _turn = self.cities_queue.lock().await;
        self.read_or_default(CITIES_KEY).await
    }

    /// Append `city` unless a city with the same name (ignoring case) and
    /// country is already saved. Returns the resulting list either way.
    pub async fn save_city(&self, city: City) -> Result<Vec<City>, StorageWriteError> {
        let _turn = self.cities_queue.lock().await;
        let mut cities: Vec<City> = self.read_or_default(CITIES_KEY).await;

        if cities.iter().any(|c| c.same_place(&city)) {
            tracing::debug!(city = %city.name, country = %city.country, "city already saved");
            return Ok(cities);
        }

        cities.push(city);
        self.write(CITIES_KEY, "Failed to save city", &cities).await?;
        Ok(cities)
    }

    /// Drop every city whose name is exactly `city_name`.
    ///
    /// Matching is case-sensitive, unlike the duplicate check in
    /// [`WeatherStore::save_city`]. Existing callers pass the stored name
    /// back verbatim and depend on this exact match.
    pub async fn remove_city(&self, city_name: &str) -> Result<Vec<City>, StorageWriteError> {
        let _turn = self.cities_queue.lock().await;
        let mut cities: Vec<City> = self.read_or_default(CITIES_KEY).await;

        cities.retain(|c| c.name != city_name);
        self.write(CITIES_KEY, "Failed to remove city", &cities).await?;
        Ok(cities)
    }

    /// History for `city_name` (exact key), newest first.
    pub async fn get_historical_data(&self, city_name: &str) -> Vec<HistoricalEntry> {
        let _turn = self.history_queue.lock().await;
        let mut all: RawHistory = self.read_or_default(HISTORY_KEY).await;

        let Some(list) = all.remove(city_name) else {
            return Vec::new();
        };
        serde_json::from_value(list).unwrap_or_else(|e| {
            tracing::warn!(city = city_name, error = %e, "stored history is corrupt; treating as empty");
            Vec::new()
        })
    }

    /// Most recent entry recorded for `city_name`.
    pub async fn latest_entry(&self, city_name: &str) -> Option<HistoricalEntry> {
        self.get_historical_data(city_name).await.into_iter().next()
    }

    /// Record `snapshot` as the newest entry for `city_name`, dropping the
    /// oldest entries beyond the history cap. Returns that city's history.
    ///
    /// Unlike the read path this refuses to continue when the existing
    /// record (or this city's list in it) cannot be read or decoded, rather
    /// than overwriting history it could not see.
    pub async fn save_weather_data(
        &self,
        city_name: &str,
        snapshot: WeatherSnapshot,
    ) -> Result<Vec<HistoricalEntry>, StorageWriteError> {
        const ACTION: &str = "Failed to save weather data";
        let fail = |source: WriteCause| StorageWriteError {
            action: ACTION,
            key: HISTORY_KEY,
            source,
        };

        let _turn = self.history_queue.lock().await;

        let mut all: RawHistory = match self.backend.get(HISTORY_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).map_err(|e| fail(WriteCause::Corrupt(e)))?,
            Ok(None) => RawHistory::new(),
            Err(e) => return Err(fail(e.into())),
        };

        let mut entries: Vec<HistoricalEntry> = match all.remove(city_name) {
            Some(list) => serde_json::from_value(list).map_err(|e| fail(WriteCause::Corrupt(e)))?,
            None => Vec::new(),
        };

        entries.insert(
            0,
            HistoricalEntry {
                timestamp: self.clock.now(),
                data: snapshot,
            },
        );
        entries.truncate(self.options.max_history_entries.max(1));

        let list = serde_json::to_value(&entries).map_err(|e| fail(e.into()))?;
        all.insert(city_name.to_string(), list);

        self.write(HISTORY_KEY, ACTION, &all).await?;
        Ok(entries)
    }

    async fn read_or_default<T>(&self, key: &'static str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed; treating as empty");
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "stored record is corrupt; treating as empty");
            T::default()
        })
    }

    async fn write<T>(
        &self,
        key: &'static str,
        action: &'static str,
        value: &T,
    ) -> Result<(), StorageWriteError>
    where
        T: Serialize + ?Sized,
    {
        let fail = |source: WriteCause| StorageWriteError { action, key, source };

        let json = serde_json::to_string(value).map_err(|e| fail(e.into()))?;
        let bytes = json.len();

        self.backend.set(key, json).await.map_err(|e| {
            tracing::error!(key, error = %e, "{action}");
            fail(e.into())
        })?;

        tracing::debug!(key, bytes, "persisted collection");
        Ok(())
    }
}
