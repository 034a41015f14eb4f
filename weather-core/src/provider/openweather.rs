use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    model::Coordinates,
    provider::{GeoMatch, Geocoder, RawForecast, RawObservation, WeatherSource},
};

/// OpenWeather-compatible HTTP backend for both capabilities.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(config.api_base_url.as_str(), api_key))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "requesting {what}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
    }

    fn coordinate_query(coords: Coordinates) -> [(&'static str, String); 3] {
        [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("units", "imperial".to_string()),
        ]
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoMatch>> {
        self.get_json(
            "geocoding",
            "/geo/1.0/direct",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )
        .await
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, coords: Coordinates) -> Result<RawObservation> {
        self.get_json("current weather", "/data/2.5/weather", &Self::coordinate_query(coords))
            .await
    }

    async fn forecast(&self, coords: Coordinates) -> Result<RawForecast> {
        self.get_json("forecast", "/data/2.5/forecast", &Self::coordinate_query(coords))
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PARIS: Coordinates = Coordinates { latitude: 48.8566, longitude: 2.3522 };

    #[tokio::test]
    async fn geocode_sends_query_limit_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "paris"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "Paris", "country": "FR", "lat": 48.8566, "lon": 2.3522 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(server.uri(), "test-key");
        let matches = client.geocode("paris", 1).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].coordinates().unwrap(), PARIS);
        assert_eq!(matches[0].name.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn current_requests_imperial_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "48.8566"))
            .and(query_param("lon", "2.3522"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "dt": 1_709_812_800,
                "main": { "temp": 53.1, "humidity": 70 },
                "weather": [{ "icon": "10d", "description": "light rain" }],
                "wind": { "speed": 6.9 }
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(format!("{}/", server.uri()), "test-key");
        let raw = client.current(PARIS).await.unwrap();

        assert_eq!(raw.city_name().unwrap(), "Paris");
        assert_eq!(raw.to_sample("Paris").unwrap().temperature_f, 53.1);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(server.uri(), "bad-key");
        let err = client.forecast(PARIS).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("forecast request failed with status 401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn invalid_json_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(server.uri(), "test-key");
        let err = client.geocode("paris", 1).await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse geocoding JSON"));
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
