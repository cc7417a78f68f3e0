use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A saved location, identified by display name + country code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,

    /// Coordinates are declared by the provider but never filled in by the
    /// add-city flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl City {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            lat: None,
            lon: None,
        }
    }

    /// Two cities are the same place when the names match ignoring case and
    /// the countries match exactly.
    pub fn same_place(&self, other: &City) -> bool {
        self.country == other.country && self.name.to_lowercase() == other.name.to_lowercase()
    }
}

/// One timestamped snapshot recorded for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub timestamp: DateTime<Utc>,
    pub data: WeatherSnapshot,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    /// Icon code such as `01d` or `10n`.
    pub icon: String,
}

/// Temperatures are in Kelvin, pressure in hPa, humidity in percent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct SysInfo {
    country: String,
}

/// The fields of a snapshot the app reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Readings {
    weather: Vec<WeatherCondition>,
    main: MainReadings,
    wind: Wind,
    name: String,
    sys: SysInfo,
    dt: i64,
}

/// Current conditions as returned by the weather provider.
///
/// The provider's JSON document is kept as received and serialized back
/// unchanged; the typed accessors read from a view decoded once on
/// construction. A document missing any of the read fields is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct WeatherSnapshot {
    readings: Readings,
    raw: Value,
}

impl TryFrom<Value> for WeatherSnapshot {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let readings = Readings::deserialize(&raw)?;
        Ok(Self { readings, raw })
    }
}

impl From<WeatherSnapshot> for Value {
    fn from(snapshot: WeatherSnapshot) -> Self {
        snapshot.raw
    }
}

impl WeatherSnapshot {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        Self::try_from(raw)
    }

    /// The document exactly as the provider sent it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn name(&self) -> &str {
        &self.readings.name
    }

    pub fn country(&self) -> &str {
        &self.readings.sys.country
    }

    pub fn main(&self) -> &MainReadings {
        &self.readings.main
    }

    pub fn wind(&self) -> &Wind {
        &self.readings.wind
    }

    pub fn conditions(&self) -> &[WeatherCondition] {
        &self.readings.weather
    }

    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.readings.weather.first()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.readings.dt, 0)
    }

    /// The city record the add-city flow persists for this snapshot.
    pub fn city(&self) -> City {
        City::new(self.name(), self.country())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    pub fn snapshot(name: &str, country: &str, temp: f64) -> WeatherSnapshot {
        WeatherSnapshot::from_value(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {
                "temp": temp,
                "feels_like": temp - 1.0,
                "temp_min": temp - 2.0,
                "temp_max": temp + 2.0,
                "pressure": 1013,
                "humidity": 60
            },
            "wind": {"speed": 3.5, "deg": 180},
            "name": name,
            "sys": {"country": country},
            "dt": 1_700_000_000
        }))
        .unwrap()
    }

    /// A complete current-weather body, nested extras included.
    pub const PARIS_BODY: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "base": "stations",
        "main": {"temp": 288.7, "feels_like": 288.1, "temp_min": 287.9, "temp_max": 289.8,
                 "pressure": 1016, "humidity": 71, "sea_level": 1016, "grnd_level": 1006},
        "visibility": 10000,
        "wind": {"speed": 5.66, "deg": 250, "gust": 9.1},
        "clouds": {"all": 75},
        "dt": 1716800000,
        "sys": {"type": 2, "id": 2041230, "country": "FR", "sunrise": 1716781863, "sunset": 1716838734},
        "timezone": 7200,
        "id": 2988507,
        "name": "Paris",
        "cod": 200
    }"#;
}
