use thiserror::Error;

/// Failures of the city → forecast pipeline. Any of them aborts the whole
/// resolution; no partial series is ever returned alongside one.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("geocoding failed for '{city}': {reason}")]
    Geocode { city: String, reason: String },

    #[error("current weather fetch failed: {0}")]
    WeatherFetch(String),

    #[error("forecast fetch failed: {0}")]
    ForecastFetch(String),
}

/// Failures of the durable history medium.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read search history: {0}")]
    Read(String),

    #[error("failed to write search history: {0}")]
    Write(String),
}

/// Anything the composed search workflow can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Renders an `anyhow` chain on one line, e.g. `outer: inner`.
pub(crate) fn describe(err: &anyhow::Error) -> String {
    format!("{err:#}")
}
