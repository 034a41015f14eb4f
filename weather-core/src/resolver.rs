//! City name → current conditions + daily forecast.

use crate::{
    error::{ResolveError, describe},
    model::ForecastSeries,
    provider::{Geocoder, WeatherSource},
};

/// Only the best geocoding match is ever used.
pub const GEOCODE_LIMIT: u8 = 1;

/// First forecast slot used (3-hour cadence, so ~12h after "now").
pub const FORECAST_START: usize = 4;

/// Slots per day at a 3-hour cadence.
pub const FORECAST_STEP: usize = 8;

/// At most this many daily samples follow the current conditions.
pub const FORECAST_DAYS: usize = 5;

/// Indices picked from a forecast feed of `len` entries: 4, 12, 20, 28, 36.
///
/// This is a fixed heuristic for a 40-entry, 3-hourly feed; it is not aware
/// of day boundaries or the location's timezone. Longer feeds are cut off
/// after [`FORECAST_DAYS`] picks.
pub fn sample_indices(len: usize) -> impl Iterator<Item = usize> {
    (FORECAST_START..len).step_by(FORECAST_STEP).take(FORECAST_DAYS)
}

#[derive(Debug)]
pub struct Resolver {
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn WeatherSource>,
}

impl Resolver {
    pub fn new(geocoder: Box<dyn Geocoder>, weather: Box<dyn WeatherSource>) -> Self {
        Self { geocoder, weather }
    }

    /// Runs geocode → current weather → forecast strictly in sequence.
    /// The first failure aborts the rest.
    pub async fn resolve(&self, city: &str) -> Result<ForecastSeries, ResolveError> {
        let query = city.trim();
        if query.is_empty() {
            return Err(ResolveError::Geocode {
                city: city.to_string(),
                reason: "city name is empty".to_string(),
            });
        }

        let geocode_err = |reason: String| {
            tracing::warn!(city = query, %reason, "geocoding failed");
            ResolveError::Geocode { city: query.to_string(), reason }
        };

        let matches = self
            .geocoder
            .geocode(query, GEOCODE_LIMIT)
            .await
            .map_err(|e| geocode_err(describe(&e)))?;
        let best = matches
            .first()
            .ok_or_else(|| geocode_err("no matching location".to_string()))?;
        let coords = best.coordinates().map_err(|e| geocode_err(e.to_string()))?;
        tracing::debug!(city = query, lat = coords.latitude, lon = coords.longitude, "geocoded");

        let current = self.weather.current(coords).await.map_err(|e| {
            tracing::warn!(error = %describe(&e), "current weather request failed");
            ResolveError::WeatherFetch(describe(&e))
        })?;
        let label = current
            .city_name()
            .map_err(|e| ResolveError::WeatherFetch(e.to_string()))?
            .to_string();
        let current = current
            .to_sample(&label)
            .map_err(|e| ResolveError::WeatherFetch(e.to_string()))?;

        let forecast = self.weather.forecast(coords).await.map_err(|e| {
            tracing::warn!(error = %describe(&e), "forecast request failed");
            ResolveError::ForecastFetch(describe(&e))
        })?;
        let list = forecast
            .list
            .ok_or_else(|| ResolveError::ForecastFetch("response is missing field `list`".into()))?;

        let daily = sample_indices(list.len())
            .map(|idx| {
                list[idx]
                    .to_sample(&label)
                    .map_err(|e| ResolveError::ForecastFetch(format!("entry {idx}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(city = %label, days = daily.len(), "resolved forecast");
        Ok(ForecastSeries::new(current, daily))
    }
}
