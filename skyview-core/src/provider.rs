use crate::{
    Config,
    error::Result,
    model::{AirQualityReport, CurrentConditions, ForecastReport, LocationCandidate},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Upper bound on autocomplete candidates.
pub const MAX_SUGGESTIONS: usize = 5;

/// Shortest trimmed query worth a geocoding call.
pub const MIN_QUERY_CHARS: usize = 2;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Candidate cities for partial input, at most [`MAX_SUGGESTIONS`].
    async fn lookup_locations(&self, query: &str) -> Result<Vec<LocationCandidate>>;

    async fn fetch_current_weather(&self, location: &str) -> Result<CurrentConditions>;

    async fn fetch_forecast(&self, location: &str) -> Result<ForecastReport>;

    /// Best effort: every failure becomes `None`.
    async fn fetch_air_quality(&self, lat: f64, lon: f64) -> Option<AirQualityReport>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key()?;
    let provider = OpenWeatherProvider::new(
        api_key,
        config.base_url.clone(),
        config.geocoding_url.clone(),
        config.timeout(),
    )?;

    Ok(Arc::new(provider))
}
