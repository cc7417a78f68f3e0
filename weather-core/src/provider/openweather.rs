use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::model::WeatherSnapshot;

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/w";

/// Image URL for a condition icon code such as `01d`.
pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_BASE_URL}/{icon_code}.png")
}

/// Current-weather lookups against OpenWeatherMap. Temperatures come back in
/// Kelvin (no `units` parameter is sent).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(city, error = %e, "OpenWeather request failed");
                ProviderError::Network(e)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(ProviderError::Network)?;

        if !status.is_success() {
            tracing::warn!(city, %status, body = %truncate_body(&body), "OpenWeather returned an error");
            return Err(match status {
                StatusCode::NOT_FOUND => ProviderError::NotFound,
                StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
                _ => ProviderError::Other(format!(
                    "status {}: {}",
                    status,
                    truncate_body(&body)
                )),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(city, error = %e, "could not parse OpenWeather response");
            ProviderError::Other(format!("invalid response body: {e}"))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    const PARIS: &str = r#"{
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 288.7, "feels_like": 288.1, "temp_min": 287.9, "temp_max": 289.8, "pressure": 1016, "humidity": 71},
        "wind": {"speed": 5.66, "deg": 250},
        "dt": 1716800000,
        "sys": {"country": "FR", "sunrise": 1716781863},
        "name": "Paris",
        "cod": 200
    }"#;

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".into()).with_base_url(format!("{}/", server.uri()))
    }

    async fn respond_with_status(status: u16) -> ProviderError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(status).set_body_string(r#"{"message":"nope"}"#))
            .mount(&server)
            .await;

        provider_for(&server)
            .current_weather("Paris")
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn parses_current_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PARIS, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = provider_for(&server).current_weather("Paris").await.unwrap();

        assert_eq!(snapshot.name(), "Paris");
        assert_eq!(snapshot.country(), "FR");
        assert_eq!(snapshot.main().humidity, 71);
        assert_eq!(snapshot.primary_condition().unwrap().description, "broken clouds");
        assert!(snapshot.raw().get("cod").is_some());
    }

    #[tokio::test]
    async fn maps_status_codes() {
        assert!(matches!(respond_with_status(404).await, ProviderError::NotFound));
        assert!(matches!(respond_with_status(401).await, ProviderError::Unauthorized));
        assert!(matches!(respond_with_status(429).await, ProviderError::RateLimited));
        assert!(matches!(respond_with_status(500).await, ProviderError::Other(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_generic_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).current_weather("Paris").await.unwrap_err();
        assert!(matches!(err, ProviderError::Other(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let provider =
            OpenWeatherProvider::new("KEY".into()).with_base_url("http://127.0.0.1:1".into());

        let err = provider.current_weather("Paris").await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[test]
    fn icon_urls() {
        assert_eq!(icon_url("01d"), "https://openweathermap.org/img/w/01d.png");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
