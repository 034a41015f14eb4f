use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Geographic position returned by geocoding. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One normalized weather observation or forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub city: String,
    pub date: NaiveDate,
    pub icon: String,
    pub description: String,
    pub temperature_f: f64,
    pub wind_speed: f64,
    pub humidity_pct: u8,
}

impl WeatherSample {
    /// Date as `M/D/YYYY`, without zero padding.
    pub fn display_date(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }
}

/// Calendar day (UTC) of a Unix timestamp.
pub fn unix_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Current conditions followed by up to five daily forecast samples.
///
/// Only the resolver builds these, so the first element is always the
/// current-conditions sample and the series is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastSeries(Vec<WeatherSample>);

impl ForecastSeries {
    pub(crate) fn new(current: WeatherSample, daily: Vec<WeatherSample>) -> Self {
        let mut samples = Vec::with_capacity(daily.len() + 1);
        samples.push(current);
        samples.extend(daily);
        Self(samples)
    }

    pub fn current(&self) -> &WeatherSample {
        &self.0[0]
    }

    pub fn daily(&self) -> &[WeatherSample] {
        &self.0[1..]
    }

    /// Canonical city label shared by every sample in the series.
    pub fn city(&self) -> &str {
        &self.current().city
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherSample> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<WeatherSample> {
        self.0
    }
}

/// A previously searched city, as stored in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub id: String,
}
