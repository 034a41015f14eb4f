//! Upstream capabilities the resolver depends on.
//!
//! The traits are deliberately vendor-neutral; [`openweather`] provides the
//! HTTP implementation. Payloads are deserialized into `Option`-heavy raw
//! schemas and validated afterwards, so a missing field becomes a
//! [`MissingField`] error instead of a deserialization panic deep in a caller.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{Coordinates, WeatherSample, unix_to_date};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Translates a place name into candidate locations, best match first.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// An empty vector is a valid "no match" answer, not an error.
    async fn geocode(&self, query: &str, limit: u8) -> anyhow::Result<Vec<GeoMatch>>;
}

/// Current conditions and the 3-hourly forecast for a position.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, coords: Coordinates) -> anyhow::Result<RawObservation>;

    async fn forecast(&self, coords: Coordinates) -> anyhow::Result<RawForecast>;
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("response is missing field `{0}`")]
pub struct MissingField(pub &'static str);

/// One geocoding candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoMatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl GeoMatch {
    pub fn coordinates(&self) -> Result<Coordinates, MissingField> {
        Ok(Coordinates {
            latitude: self.lat.ok_or(MissingField("lat"))?,
            longitude: self.lon.ok_or(MissingField("lon"))?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}

/// Shape shared by the current-weather response and each forecast slot.
/// `name` is only present on the current-weather response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObservation {
    pub name: Option<String>,
    pub dt: Option<i64>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
}

impl RawObservation {
    /// City label reported by the provider.
    pub fn city_name(&self) -> Result<&str, MissingField> {
        self.name.as_deref().ok_or(MissingField("name"))
    }

    /// Validates the payload and labels it with `city`.
    pub fn to_sample(&self, city: &str) -> Result<WeatherSample, MissingField> {
        let dt = self.dt.ok_or(MissingField("dt"))?;
        let date = unix_to_date(dt).ok_or(MissingField("dt"))?;
        let condition = self.weather.first().ok_or(MissingField("weather"))?;
        let main = self.main.as_ref().ok_or(MissingField("main"))?;
        let wind = self.wind.as_ref().ok_or(MissingField("wind"))?;

        Ok(WeatherSample {
            city: city.to_string(),
            date,
            icon: condition.icon.clone().ok_or(MissingField("weather.icon"))?,
            description: condition
                .description
                .clone()
                .ok_or(MissingField("weather.description"))?,
            temperature_f: main.temp.ok_or(MissingField("main.temp"))?,
            wind_speed: wind.speed.ok_or(MissingField("wind.speed"))?,
            humidity_pct: main.humidity.ok_or(MissingField("main.humidity"))?,
        })
    }
}

/// The 5-day / 3-hour forecast feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    pub list: Option<Vec<RawObservation>>,
}
