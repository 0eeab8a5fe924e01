//! Core library for the `skyview` weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider (geocoding, current weather, forecast, air quality)
//! - Location validation
//! - A renderer that describes screen updates for an injected render target
//! - The input controller with debounced autocomplete
//!
//! It is used by `skyview-cli`, but any surface implementing
//! [`RenderTarget`] can drive it.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod validate;

pub use config::{Config, VideoPaths};
pub use controller::{Controller, SearchReport};
pub use error::WeatherError;
pub use model::{
    AirQualityReading, ForecastEntry, LocationCandidate, SearchQuery, SearchState,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use render::{BackgroundVideo, Field, RenderTarget, Renderer, ViewUpdate};
pub use validate::validate_location;
