use crate::{
    error::ServiceError,
    history::{HistoryMedium, HistoryStore},
    model::{ForecastSeries, HistoryEntry},
    resolver::Resolver,
};

/// Resolver and history store wired together for a front end.
#[derive(Debug)]
pub struct WeatherService<M> {
    resolver: Resolver,
    history: HistoryStore<M>,
}

impl<M: HistoryMedium> WeatherService<M> {
    pub fn new(resolver: Resolver, history: HistoryStore<M>) -> Self {
        Self { resolver, history }
    }

    /// Resolves `city` and records the provider's canonical name in the
    /// history. History is only touched after a successful resolution, and
    /// a failure to record it is logged without discarding the forecast.
    pub async fn search(&self, city: &str) -> Result<ForecastSeries, ServiceError> {
        let series = self.resolver.resolve(city).await?;
        if let Err(err) = self.history.add_if_absent(series.city()).await {
            tracing::warn!(city = series.city(), error = %err, "could not record search history");
        }
        Ok(series)
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ServiceError> {
        Ok(self.history.list().await?)
    }

    pub async fn forget(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.history.remove(id).await?)
    }
}
