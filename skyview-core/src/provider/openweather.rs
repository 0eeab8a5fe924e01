use async_trait::async_trait;
use reqwest::{Client, StatusCode as HttpStatus};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    error::{Result, WeatherError},
    model::{AirQualityReport, CurrentConditions, ForecastReport, LocationCandidate, StatusCode},
};

use super::{MAX_SUGGESTIONS, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    geocoding_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        geocoding_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            geocoding_url,
            http,
        })
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<(HttpStatus, String)> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        Ok((status, body))
    }

    async fn fetch_air_quality_inner(&self, lat: f64, lon: f64) -> Result<AirQualityReport> {
        let url = format!("{}/air_pollution", self.base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());

        let (status, body) = self.get(&url, &[("lat", lat.as_str()), ("lon", lon.as_str())]).await?;
        if !status.is_success() {
            return Err(WeatherError::Network(format!(
                "Failed to fetch air quality data. Status: {}",
                status.as_u16()
            )));
        }

        parse(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn lookup_locations(&self, query: &str) -> Result<Vec<LocationCandidate>> {
        let limit = MAX_SUGGESTIONS.to_string();
        let (status, body) = self
            .get(&self.geocoding_url, &[("q", query), ("limit", limit.as_str())])
            .await?;

        if !status.is_success() {
            return Err(WeatherError::Network(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        let mut candidates: Vec<LocationCandidate> = parse(&body)?;
        candidates.truncate(MAX_SUGGESTIONS);
        debug!(count = candidates.len(), "geocoding lookup finished");

        Ok(candidates)
    }

    #[instrument(skip(self))]
    async fn fetch_current_weather(&self, location: &str) -> Result<CurrentConditions> {
        let url = format!("{}/weather", self.base_url);
        let (status, body) = self
            .get(&url, &[("q", location), ("units", "metric")])
            .await?;

        if status == HttpStatus::NOT_FOUND {
            return Err(WeatherError::NotFound);
        }
        if !status.is_success() {
            return Err(WeatherError::Upstream(upstream_message(&body).unwrap_or_else(|| {
                format!("Failed to fetch weather data. Status: {}", status.as_u16())
            })));
        }

        let value: Value = parse(&body)?;
        if application_status(&value) != Some(StatusCode::Number(200)) {
            return Err(WeatherError::Upstream(error_message(&value)));
        }

        from_value(value)
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, location: &str) -> Result<ForecastReport> {
        let url = format!("{}/forecast", self.base_url);
        let (status, body) = self
            .get(&url, &[("q", location), ("units", "metric")])
            .await?;

        if status == HttpStatus::NOT_FOUND {
            return Err(WeatherError::NotFound);
        }
        if !status.is_success() {
            return Err(WeatherError::Upstream(upstream_message(&body).unwrap_or_else(|| {
                format!("HTTP error! status: {}", status.as_u16())
            })));
        }

        // The forecast endpoint reports success as the string "200".
        let value: Value = parse(&body)?;
        if application_status(&value) != Some(StatusCode::Text("200".to_string())) {
            return Err(WeatherError::Upstream(error_message(&value)));
        }

        from_value(value)
    }

    async fn fetch_air_quality(&self, lat: f64, lon: f64) -> Option<AirQualityReport> {
        match self.fetch_air_quality_inner(lat, lon).await {
            Ok(report) => Some(report),
            Err(err) => {
                warn!(error = %err, "air quality unavailable");
                None
            }
        }
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        WeatherError::InvalidData(format!(
            "Received invalid weather data: {e} ({})",
            truncate_body(body)
        ))
    })
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| WeatherError::InvalidData(format!("Received invalid weather data: {e}")))
}

fn application_status(value: &Value) -> Option<StatusCode> {
    value
        .get("cod")
        .cloned()
        .and_then(|cod| serde_json::from_value(cod).ok())
}

fn error_message(value: &Value) -> String {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown error from API".to_string())
}

fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
